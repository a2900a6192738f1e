// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::{StageSweep, TeardownConfig};
use dvo_adapters::{FakeLocalArtifacts, FakeProvider, MemoryProvider, ProviderCall};
use dvo_core::test_support::single_repository_record;
use dvo_core::{DeployPart, ProgressEvent, ScopeRef, Summary, DEPLOY_TAG_KEY};
use dvo_storage::MemoryCheckpointStore;
use std::collections::BTreeMap;
use std::time::Duration;

mod failures;
mod ordering;
mod resume;
mod shared;

const KEY: &str = "svc";

/// Default settings without the waits.
fn fast() -> TeardownConfig {
    TeardownConfig::default()
        .poll_interval(Duration::ZERO)
        .bootstrap_interval(Duration::ZERO)
}

struct Harness {
    provider: FakeProvider,
    store: Arc<MemoryCheckpointStore>,
    local: FakeLocalArtifacts,
    engine: Teardown<FakeProvider, MemoryCheckpointStore, FakeLocalArtifacts>,
}

impl Harness {
    /// A provider holding every resource of `record`, and `record` stored under [`KEY`].
    fn new(record: ProgressRecord, config: TeardownConfig) -> Self {
        let provider = FakeProvider::new();
        seed(provider.inventory(), &record);
        let store = Arc::new(MemoryCheckpointStore::with_record(KEY, record));
        let local = FakeLocalArtifacts::new();
        let engine = Teardown::new(provider.clone(), Arc::clone(&store), local.clone(), config);
        Self { provider, store, local, engine }
    }

    fn folders() -> Vec<LocalFolder> {
        vec![LocalFolder::new("svc", "/work/svc")]
    }

    async fn run(&self) -> Result<TeardownReport, TeardownError> {
        self.engine.teardown(KEY, &Self::folders(), &Progress::silent()).await
    }

    fn checkpoint(&self) -> Option<ProgressRecord> {
        self.store.get(KEY)
    }

    /// Position of the first call matching `pred`.
    fn position(&self, pred: impl Fn(&ProviderCall) -> bool) -> Option<usize> {
        self.provider.calls().iter().position(pred)
    }

    fn delete_of(&self, id: &str) -> Option<usize> {
        self.position(|call| matches!(call, ProviderCall::Delete { id: i, .. } if i == id))
    }

    fn sweep_of(&self, kind: ResourceKind) -> Option<usize> {
        self.position(|call| matches!(call, ProviderCall::DeleteByTag { kind: k, .. } if *k == kind))
    }
}

/// Seed `inventory` with one tagged resource per slot of `record`.
///
/// Live handles keep their id. Unresolved slots get a `ghost-*` resource that
/// only a tag sweep can find. Stages live in their pipeline, shared project
/// resources in the project, container and artifact repositories and
/// knowledge bases in the compartment.
fn seed(inventory: &MemoryProvider, record: &ProgressRecord) {
    let compartment = record.compartment_id().unwrap_or("c1").to_string();
    let mut seed = Seed { record, inventory, tag: record.tag.clone().unwrap_or_default(), ghosts: 0 };
    let parent = match record.project.as_ref().map(ScopeRef::handle) {
        Some(handle) => seed.put(ResourceKind::Project, &handle, &compartment, Vec::new()),
        None => compartment.clone(),
    };

    for tier in &Tier::ALL[..6] {
        for path in tier_paths(record, *tier) {
            let Some(handle) = record.get(&path) else { continue };
            let (scope, predecessors) = seed.placement(&path, &parent, &compartment);
            seed.put(path.kind(), &handle, &scope, predecessors);
        }
    }

    if let Some(handle) = &record.cluster_environment {
        seed.put(ResourceKind::DeployEnvironment, handle, &parent, Vec::new());
    }
    if let Some(handle) = &record.artifact_repository {
        seed.put(ResourceKind::ArtifactRepository, handle, &compartment, Vec::new());
    }
    if let Some(handle) = &record.knowledge_base {
        seed.put(ResourceKind::KnowledgeBase, handle, &compartment, Vec::new());
    }
}

struct Seed<'a> {
    record: &'a ProgressRecord,
    inventory: &'a MemoryProvider,
    tag: String,
    ghosts: usize,
}

impl Seed<'_> {
    fn put(&mut self, kind: ResourceKind, handle: &Handle, scope: &str, predecessors: Vec<String>) -> String {
        let id = match handle {
            Handle::Live(id) => id.clone(),
            Handle::Unresolved => {
                self.ghosts += 1;
                format!("ghost-{}-{}", kind, self.ghosts)
            }
        };
        self.inventory.insert(tagged(&id, kind, scope, &self.tag).predecessors(predecessors).build());
        id
    }

    fn live(&self, path: FieldPath) -> Option<String> {
        self.record.get(&path).and_then(|handle| handle.id().map(str::to_string))
    }

    fn placement(&self, path: &FieldPath, parent: &str, compartment: &str) -> (String, Vec<String>) {
        let FieldPath::Repository { scope, field } = path else {
            return (parent.to_string(), Vec::new());
        };
        let in_pipeline = |pipeline: Option<String>, predecessors: Vec<String>| {
            (pipeline.unwrap_or_else(|| parent.to_string()), predecessors)
        };
        match field {
            RepoField::Build(flavor, BuildPart::BuildStage) => {
                let pipeline = self.live(FieldPath::repo(scope, RepoField::Build(flavor.clone(), BuildPart::Pipeline)));
                in_pipeline(pipeline.clone(), pipeline.into_iter().collect())
            }
            RepoField::Build(flavor, BuildPart::ArtifactsStage) => {
                let pipeline = self.live(FieldPath::repo(scope, RepoField::Build(flavor.clone(), BuildPart::Pipeline)));
                let build_stage =
                    self.live(FieldPath::repo(scope, RepoField::Build(flavor.clone(), BuildPart::BuildStage)));
                in_pipeline(pipeline, build_stage.into_iter().collect())
            }
            RepoField::Deploy(
                flavor,
                DeployPart::SetupSecretStage | DeployPart::DeployToClusterStage | DeployPart::ApplyConfigStage,
            ) => {
                let pipeline = self.live(FieldPath::repo(scope, RepoField::Deploy(flavor.clone(), DeployPart::Pipeline)));
                in_pipeline(pipeline.clone(), pipeline.into_iter().collect())
            }
            RepoField::Deploy(_, DeployPart::ContainerRepository) => (compartment.to_string(), Vec::new()),
            _ => (parent.to_string(), Vec::new()),
        }
    }
}

/// Summary builder for a resource carrying the deploy tag `tag`.
fn tagged(id: &str, kind: ResourceKind, scope: &str, tag: &str) -> dvo_core::SummaryBuilder {
    let tags: BTreeMap<String, String> = [(DEPLOY_TAG_KEY.to_string(), tag.to_string())].into();
    Summary::builder().id(id).kind(kind).scope(scope).display_name(id).tags(tags)
}

#[tokio::test]
async fn single_repository_is_torn_down_pipeline_first() {
    let h = Harness::new(single_repository_record(), fast());

    let report = h.run().await.unwrap();

    assert_eq!(h.provider.deleted_ids(), vec!["p1", "r1"]);
    assert_eq!(
        h.provider.swept_kinds(),
        vec![
            ResourceKind::DeployStage,
            ResourceKind::DeployPipeline,
            ResourceKind::BuildStage,
            ResourceKind::BuildPipeline,
        ]
    );
    assert!(report.found);
    assert_eq!(report.deleted, 2);
    assert_eq!(h.checkpoint(), None);
    assert!(h.provider.inventory().live_ids().is_empty());
    assert_eq!(h.local.cleaned(), vec![PathBuf::from("/work/svc")]);
}

#[tokio::test]
async fn absent_checkpoint_is_a_no_op() {
    let h = Harness::new(ProgressRecord::default(), fast());

    let report = h.engine.teardown("other", &[], &Progress::silent()).await.unwrap();

    assert!(!report.found);
    assert!(h.provider.calls().is_empty());
    assert!(h.local.cleaned().is_empty());
}

#[tokio::test]
async fn empty_record_is_cleared_without_provider_calls() {
    let record = ProgressRecord {
        compartment: Some(ScopeRef::new("c1", "dev")),
        tag: Some("t1".to_string()),
        ..Default::default()
    };
    let h = Harness::new(record, fast());

    let report = h.run().await.unwrap();

    assert!(report.found);
    assert_eq!(report.deleted, 0);
    assert!(h.provider.calls().is_empty());
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn untagged_record_skips_the_remnant_sweep() {
    let mut record = single_repository_record();
    record.tag = None;
    let h = Harness::new(record, fast());

    h.run().await.unwrap();

    assert!(h.provider.swept_kinds().is_empty());
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn remnant_sweep_can_be_turned_off() {
    let h = Harness::new(single_repository_record(), fast().remnant_sweep(false));

    h.run().await.unwrap();

    assert!(h.provider.swept_kinds().is_empty());
    assert_eq!(h.provider.deleted_ids(), vec!["p1", "r1"]);
}

#[tokio::test]
async fn unrelated_folders_are_not_cleaned() {
    let h = Harness::new(single_repository_record(), fast());
    let folders = vec![LocalFolder::new("web", "/work/web")];

    h.engine.teardown(KEY, &folders, &Progress::silent()).await.unwrap();

    assert!(h.local.cleaned().is_empty());
}

#[tokio::test]
async fn folders_are_torn_down_in_turn() {
    let h = Harness::new(single_repository_record(), fast());
    let folders = vec![
        LocalFolder::from_path(Path::new("/work/svc")),
        LocalFolder::from_path(Path::new("/work/web")),
    ];

    let reports = h.engine.teardown_folders(&folders, &Progress::silent()).await.unwrap();

    let found: Vec<(&str, bool)> = reports.iter().map(|r| (r.key.as_str(), r.found)).collect();
    assert_eq!(found, vec![("svc", true), ("web", false)]);
    assert_eq!(h.checkpoint(), None);
}

#[tokio::test]
async fn folder_names_with_spaces_map_to_their_key() {
    let h = Harness::new(single_repository_record(), fast());
    let folders = vec![LocalFolder::new("my svc", "/work/my svc")];
    let store = Arc::new(MemoryCheckpointStore::with_record("my_svc", single_repository_record()));
    let engine = Teardown::new(h.provider.clone(), Arc::clone(&store), h.local.clone(), fast());

    let reports = engine.teardown_folders(&folders, &Progress::silent()).await.unwrap();

    assert_eq!(reports[0].key, "my_svc");
    assert!(reports[0].found);
    assert_eq!(store.get("my_svc"), None);
}

#[tokio::test]
async fn progress_names_each_deletion_and_sweep() {
    let h = Harness::new(single_repository_record(), fast());
    let (progress, mut rx) = Progress::channel();

    h.engine.teardown(KEY, &Harness::folders(), &progress).await.unwrap();
    drop(progress);

    let mut messages = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ProgressEvent::Step { message } = event {
            messages.push(message);
        }
    }
    assert_eq!(
        messages,
        vec![
            "Deleting docker_native build pipeline of svc...",
            "Deleting code repository of svc...",
            "Deleting local resources of svc...",
            "Deleting deployment stages by deploy tag...",
            "Deleting deployment pipelines by deploy tag...",
            "Deleting build stages by deploy tag...",
            "Deleting build pipelines by deploy tag...",
        ]
    );
}

#[tokio::test]
async fn legacy_checkpoint_file_tears_down_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("svc.json"),
        r#"{
            "compartment": {"ocid": "c1", "name": "dev"},
            "tag": "t1",
            "repositories": {"svc": {"codeRepository": "r1", "docker_nibuildPipeline": "p1"}}
        }"#,
    )
    .unwrap();
    let provider = FakeProvider::new();
    seed(provider.inventory(), &single_repository_record());
    let store = Arc::new(dvo_storage::FileCheckpointStore::new(dir.path()));
    let engine = Teardown::new(provider.clone(), Arc::clone(&store), FakeLocalArtifacts::new(), fast());

    let report = engine.teardown(KEY, &[], &Progress::silent()).await.unwrap();

    assert_eq!(report.deleted, 2);
    assert_eq!(provider.deleted_ids(), vec!["p1", "r1"]);
    assert!(!dir.path().join("svc.json").exists());
}

#[test]
fn folder_name_comes_from_the_last_path_component() {
    let folder = LocalFolder::from_path(Path::new("/work/my svc"));
    assert_eq!(folder.name, "my svc");
    assert_eq!(folder.key().unwrap(), "my_svc");
}

#[test]
fn stage_sweep_parses_its_config_names() {
    assert_eq!("folded".parse::<StageSweep>(), Ok(StageSweep::Folded));
    assert_eq!("per-tier".parse::<StageSweep>(), Ok(StageSweep::PerTier));
    assert!("sometimes".parse::<StageSweep>().is_err());
}
