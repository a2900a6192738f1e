// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boilerplate shared by records, configs and tree specs.

/// `Display` for an enum from a variant-to-label table. Resource kinds,
/// lifecycles and tree groups render through this.
///
/// ```ignore
/// crate::simple_display! {
///     Lifecycle {
///         Active => "ACTIVE",
///         Deleting => "DELETING",
///     }
/// }
/// ```
///
/// Variants carrying data list their fields as `Other(..)`.
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($fields:tt)* ))? => $label:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($fields)* ))? => $label, )+
                })
            }
        }
    };
}

/// Chainable by-value setters, for request and config types assembled
/// from a `Default` or a constructor.
///
/// ```ignore
/// impl TeardownConfig {
///     dvo_core::setters! {
///         set { poll_interval: Duration, remnant_sweep: bool }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (set { $( $field:ident : $ty:ty ),* $(,)? }) => {
        $(
            pub fn $field(mut self, value: $ty) -> Self {
                self.$field = value;
                self
            }
        )*
    };
}

/// Fixture builder for provider rows in tests. Only compiled with `test`
/// or the `test-support` feature; `Target::builder()` starts from the
/// listed defaults.
///
/// `into` fields accept anything convertible (ids and names); `set`
/// fields take their type as is.
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? }
            set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $into_field: $into_ty, )*
            $( $set_field: $set_ty, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $into_field: $into_default.into(), )*
                    $( $set_field: $set_default, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $into_field(mut self, value: impl Into<$into_ty>) -> Self {
                    self.$into_field = value.into();
                    self
                }
            )*

            $crate::setters! { set { $( $set_field: $set_ty ),* } }

            pub fn build(self) -> $target {
                $target {
                    $( $into_field: self.$into_field, )*
                    $( $set_field: self.$set_field, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

#[cfg(test)]
#[path = "macros_tests.rs"]
mod tests;
