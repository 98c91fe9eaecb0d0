// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestration: bootstrap, pull, classify, resolve, apply, fan out.

use crate::apply;
use crate::classify::{classify_file, SyncState};
use crate::discover::{discover, Discovery};
use crate::error::SyncError;
use crate::mcp::{register_mcp, registered_mcp_names, unregister_mcp};
use agx_adapters::{ConflictChoice, GitAdapter, Interact, InteractError, ProcessRunner};
use agx_core::{
    AgentKind, Capability, Clock, CommandFormat, Manifest, RepoRecord, RepoRef, SYSTEM_SLOT,
    USER_SLOT,
};
use agx_drive::DriveStore;
use agx_store::Store;
use agx_versions::{sync_resources_to_version, VersionManager};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Source cloned into the reserved `system` slot when the user syncs with
/// no repo configured.
pub const DEFAULT_SYSTEM_SOURCE: &str = "gh:agx-tools/starter-config";

/// Signal the scheduler daemon that the jobs directory changed. The CLI
/// wires this to the daemon's reload; tests and the daemon itself use the
/// no-op.
pub trait ReloadSignal: Send + Sync {
    fn reload(&self);
}

/// Default no-op signal.
pub struct NoReload;

impl ReloadSignal for NoReload {
    fn reload(&self) {}
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Repo slot to sync; defaults to the highest-priority slot.
    pub slot: Option<String>,
    /// Explicit source, overriding the slot's recorded one.
    pub source: Option<String>,
    /// Resolve every conflict by keeping local content.
    pub yes: bool,
    /// Resolve every conflict by overwriting local content.
    pub force: bool,
    /// Classify and report only; change nothing.
    pub dry_run: bool,
    /// Also unregister MCP servers absent from the manifest.
    pub clean: bool,
    /// Skip agent CLI installs.
    pub skip_clis: bool,
    /// Skip MCP registration.
    pub skip_mcp: bool,
    /// Restrict target agents; empty selects per manifest/meta.
    pub agents: Vec<AgentKind>,
}

/// What one sync run did.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub slot: String,
    pub commit: String,
    pub new_installed: Vec<String>,
    pub in_sync: Vec<String>,
    pub overwritten: Vec<String>,
    pub skipped: Vec<String>,
    /// (item, error) pairs collected along the way; never fatal.
    pub failures: Vec<(String, String)>,
    pub mcp_registered: Vec<String>,
    pub jobs_installed: Vec<String>,
    pub drives_installed: Vec<String>,
    pub clis_installed: Vec<String>,
}

/// Terminal state of a sync run.
#[derive(Debug)]
pub enum SyncOutcome {
    Completed(SyncSummary),
    /// The user cancelled during conflict resolution. Items already
    /// installed stay installed; the command exits 0.
    Cancelled,
}

enum Action {
    Command(usize),
    Skill(usize),
    Hook(usize),
    Memory(usize),
}

struct SyncItem {
    label: String,
    state: SyncState,
    action: Action,
}

pub struct SyncEngine<C: Clock> {
    store: Store,
    git: Arc<dyn GitAdapter>,
    runner: Arc<dyn ProcessRunner>,
    interact: Arc<dyn Interact>,
    reload: Arc<dyn ReloadSignal>,
    clock: C,
    /// Real user home (for drive project resolution and real-home MCP).
    user_home: PathBuf,
}

impl<C: Clock> SyncEngine<C> {
    pub fn new(
        store: Store,
        git: Arc<dyn GitAdapter>,
        runner: Arc<dyn ProcessRunner>,
        interact: Arc<dyn Interact>,
        reload: Arc<dyn ReloadSignal>,
        clock: C,
        user_home: PathBuf,
    ) -> Self {
        Self {
            store,
            git,
            runner,
            interact,
            reload,
            clock,
            user_home,
        }
    }

    /// Run one sync. See the module docs for the phase order.
    pub async fn sync(&self, options: &SyncOptions) -> Result<SyncOutcome, SyncError> {
        self.store.ensure_layout()?;

        let (slot, record) = self.resolve_slot(options).await?;
        let repo_ref = RepoRef::parse(&record.source)?;
        let checkout = self.store.repos_dir().join(&slot);
        let git_sync = self
            .git
            .clone_or_pull(&repo_ref.clone_url(), &record.branch, &checkout)
            .await?;

        let discovery = discover(&checkout)?;
        let selected = self.selected_agents(options, discovery.manifest.as_ref());

        let mut summary = SyncSummary {
            slot: slot.clone(),
            commit: git_sync.commit.clone(),
            ..SyncSummary::default()
        };

        // Agent CLI installs come first so per-version targets exist.
        if !options.skip_clis && !options.dry_run {
            self.install_clis(&discovery, &selected, &mut summary).await;
        }

        let versions = VersionManager::new(self.store.clone(), self.runner.clone());
        let items = self.classify_all(&discovery, &selected, &versions);

        // New items install before conflict resolution.
        for item in items.iter().filter(|i| i.state == SyncState::New) {
            if options.dry_run {
                summary.new_installed.push(item.label.clone());
                continue;
            }
            match self.apply_item(&discovery, item) {
                Ok(()) => summary.new_installed.push(item.label.clone()),
                Err(e) => summary.failures.push((item.label.clone(), e.to_string())),
            }
        }
        summary.in_sync.extend(
            items
                .iter()
                .filter(|i| i.state == SyncState::InSync)
                .map(|i| i.label.clone()),
        );

        // Serialized conflict resolution in discovery order.
        for item in items.iter().filter(|i| i.state == SyncState::Drifted) {
            let choice = if options.force {
                ConflictChoice::Overwrite
            } else if options.yes {
                ConflictChoice::Skip
            } else {
                match self.interact.resolve_conflict(&item.label) {
                    Ok(choice) => choice,
                    Err(InteractError::Cancelled) => return Ok(SyncOutcome::Cancelled),
                    Err(e) => return Err(SyncError::Io {
                        action: "prompt",
                        path: PathBuf::new(),
                        source: std::io::Error::other(e),
                    }),
                }
            };
            match choice {
                ConflictChoice::CancelAll => return Ok(SyncOutcome::Cancelled),
                ConflictChoice::Skip => summary.skipped.push(item.label.clone()),
                ConflictChoice::Overwrite => {
                    if options.dry_run {
                        summary.overwritten.push(item.label.clone());
                        continue;
                    }
                    match self.apply_item(&discovery, item) {
                        Ok(()) => summary.overwritten.push(item.label.clone()),
                        Err(e) => summary.failures.push((item.label.clone(), e.to_string())),
                    }
                }
            }
        }

        if options.dry_run {
            return Ok(SyncOutcome::Completed(summary));
        }

        // MCP registration per (agent, version); failures never stop others.
        if !options.skip_mcp {
            self.register_mcps(&discovery, &selected, &versions, options, &mut summary)
                .await;
        }

        // Jobs: validate-and-copy, then nudge the daemon once.
        let mut jobs_changed = false;
        for job in &discovery.jobs {
            match apply::install_job(&self.store, job) {
                Ok(spec) => {
                    jobs_changed = true;
                    summary.jobs_installed.push(spec.name);
                }
                Err(e) => summary
                    .failures
                    .push((format!("job {}", job.name), e.to_string())),
            }
        }
        if jobs_changed {
            self.reload.reload();
        }

        // Drives
        let drives = DriveStore::new(self.store.clone(), self.user_home.clone());
        for drive in &discovery.drives {
            match apply::install_drive(&drives, drive) {
                Ok(()) => summary.drives_installed.push(drive.name.clone()),
                Err(e) => summary
                    .failures
                    .push((format!("drive {}", drive.name), e.to_string())),
            }
        }

        // Per-version fan-out after central installation.
        for agent in &selected {
            if let Some(version) = self.active_version(&versions, *agent, &discovery) {
                if versions.is_installed(*agent, &version) {
                    if let Err(e) = sync_resources_to_version(&self.store, *agent, &version) {
                        summary
                            .failures
                            .push((format!("link {agent}@{version}"), e.to_string()));
                    }
                }
            }
        }

        // Record the sync on the slot (bypassing the readonly check: the
        // system slot updates its own bookkeeping too).
        let mut updated = record.clone();
        updated.commit = git_sync.commit;
        updated.last_sync = self.clock.now_utc().to_rfc3339();
        self.store.set_repo_unchecked(&slot, updated)?;

        Ok(SyncOutcome::Completed(summary))
    }

    /// Pick the slot to sync, bootstrapping the reserved `system` slot from
    /// the default source when nothing is configured.
    async fn resolve_slot(
        &self,
        options: &SyncOptions,
    ) -> Result<(String, RepoRecord), SyncError> {
        if let Some(source) = &options.source {
            let parsed = RepoRef::parse(source)?;
            let slot = options.slot.clone().unwrap_or_else(|| USER_SLOT.to_string());
            let meta = self.store.read_meta();
            let priority = meta
                .repos
                .get(&slot)
                .map(|r| r.priority)
                .or_else(|| agx_core::Meta::reserved_priority(&slot))
                .unwrap_or_else(|| meta.next_slot_priority());
            let record = RepoRecord {
                source: source.clone(),
                branch: parsed.branch().to_string(),
                commit: String::new(),
                last_sync: String::new(),
                priority,
                readonly: false,
            };
            self.store.set_repo(&slot, record.clone())?;
            return Ok((slot, record));
        }

        if let Some(slot) = &options.slot {
            let record = self
                .store
                .get_repo(slot)
                .ok_or_else(|| SyncError::UnknownSlot(slot.clone()))?;
            return Ok((slot.clone(), record));
        }

        if let Some((slot, record)) = self.store.highest_priority_repo() {
            return Ok((slot, record));
        }

        // Bootstrap: no repo configured.
        let parsed = RepoRef::parse(DEFAULT_SYSTEM_SOURCE)?;
        let record = RepoRecord {
            source: DEFAULT_SYSTEM_SOURCE.to_string(),
            branch: parsed.branch().to_string(),
            commit: String::new(),
            last_sync: String::new(),
            priority: 0,
            readonly: true,
        };
        self.store.set_repo_unchecked(SYSTEM_SLOT, record.clone())?;
        tracing::info!(source = DEFAULT_SYSTEM_SOURCE, "bootstrapped system repo");
        Ok((SYSTEM_SLOT.to_string(), record))
    }

    /// Agents this sync targets: explicit option, manifest defaults, the
    /// meta `sync` set, or every agent.
    fn selected_agents(
        &self,
        options: &SyncOptions,
        manifest: Option<&Manifest>,
    ) -> Vec<AgentKind> {
        if !options.agents.is_empty() {
            return options.agents.clone();
        }
        if let Some(defaults) = manifest.and_then(|m| m.defaults.as_ref()) {
            if !defaults.agents.is_empty() {
                return defaults.agents.clone();
            }
        }
        if let Some(sync_set) = self.store.read_meta().sync {
            return sync_set.into_iter().collect();
        }
        AgentKind::ALL.to_vec()
    }

    async fn install_clis(
        &self,
        discovery: &Discovery,
        selected: &[AgentKind],
        summary: &mut SyncSummary,
    ) {
        let Some(manifest) = &discovery.manifest else {
            return;
        };
        let versions = VersionManager::new(self.store.clone(), self.runner.clone());
        for (agent, version) in &manifest.agents {
            if !selected.contains(agent) {
                continue;
            }
            if versions.is_installed(*agent, version) {
                continue;
            }
            match versions.install_version(*agent, version).await {
                Ok(outcome) => {
                    if let Err(e) = agx_versions::create_shim(&self.store, *agent) {
                        summary
                            .failures
                            .push((format!("shim {agent}"), e.to_string()));
                    }
                    summary
                        .clis_installed
                        .push(format!("{agent}@{}", outcome.version));
                }
                Err(e) => summary
                    .failures
                    .push((format!("install {agent}@{version}"), e.to_string())),
            }
        }
    }

    /// Classify every (resource, target agent) pair, deduplicated by the
    /// install target so a shared markdown command prompts once, while a
    /// TOML-format agent's converted rendition is its own item.
    fn classify_all(
        &self,
        discovery: &Discovery,
        selected: &[AgentKind],
        versions: &VersionManager,
    ) -> Vec<SyncItem> {
        let mut items = Vec::new();
        let mut seen_targets: BTreeSet<PathBuf> = BTreeSet::new();

        for (idx, cmd) in discovery.commands.iter().enumerate() {
            let agents: Vec<AgentKind> = match cmd.agent {
                Some(agent) => vec![agent],
                None => selected.to_vec(),
            };
            for agent in agents {
                if cmd.agent.is_none() && discovery.command_source(&cmd.name, agent).is_some_and(|src| src.agent.is_some()) {
                    // An agent-specific override wins for this agent
                    continue;
                }
                let target = self.command_target_for(&cmd.name, agent, versions, discovery);
                if !seen_targets.insert(target.clone()) {
                    continue;
                }
                let label = match cmd.agent {
                    Some(agent) => format!("command {} ({agent})", cmd.name),
                    None => format!("command {}", cmd.name),
                };
                items.push(SyncItem {
                    state: classify_file(&cmd.path, &target, &cmd.name),
                    label,
                    action: Action::Command(idx),
                });
            }
        }

        for (idx, skill) in discovery.skills.iter().enumerate() {
            // The manifest file stands in for the whole skill directory.
            let source = skill.path.join("SKILL.md");
            let target = self.store.skills_dir().join(&skill.name).join("SKILL.md");
            items.push(SyncItem {
                state: classify_file(&source, &target, &skill.name),
                label: format!("skill {}", skill.name),
                action: Action::Skill(idx),
            });
        }

        for (idx, hook) in discovery.hooks.iter().enumerate() {
            let target = self.store.hooks_dir().join(&hook.name);
            items.push(SyncItem {
                state: classify_file(&hook.path, &target, &hook.name),
                label: format!("hook {}", hook.name),
                action: Action::Hook(idx),
            });
        }

        for (idx, memory) in discovery.memory.iter().enumerate() {
            let target = self.store.memory_dir().join(&memory.file_name);
            items.push(SyncItem {
                state: classify_file(&memory.path, &target, &memory.file_name),
                label: format!("memory {}", memory.file_name),
                action: Action::Memory(idx),
            });
        }

        items
    }

    /// Install target for one (command, agent) pair: the central markdown
    /// copy, except TOML-format agents with an installed version, whose
    /// rendition lives in the version home.
    fn command_target_for(
        &self,
        name: &str,
        agent: AgentKind,
        versions: &VersionManager,
        discovery: &Discovery,
    ) -> PathBuf {
        if agent.info().command_format == CommandFormat::Toml {
            if let Some(version) = self.active_version(versions, agent, discovery) {
                if versions.is_installed(agent, &version) {
                    let info = agent.info();
                    return versions
                        .home_dir(agent, &version)
                        .join(info.config_dir)
                        .join(info.commands_subdir)
                        .join(format!("{name}.toml"));
                }
            }
        }
        apply::command_target(&self.store, name)
    }

    /// Version in effect for an agent: manifest pin, else global default.
    fn active_version(
        &self,
        versions: &VersionManager,
        agent: AgentKind,
        discovery: &Discovery,
    ) -> Option<String> {
        discovery
            .manifest
            .as_ref()
            .and_then(|m| m.agents.get(&agent).cloned())
            .or_else(|| versions.default_version(agent))
    }

    fn apply_item(&self, discovery: &Discovery, item: &SyncItem) -> Result<(), SyncError> {
        match item.action {
            Action::Command(idx) => {
                apply::install_command(&self.store, &discovery.commands[idx])
            }
            Action::Skill(idx) => apply::install_skill(&self.store, &discovery.skills[idx]),
            Action::Hook(idx) => apply::install_hook(&self.store, &discovery.hooks[idx]),
            Action::Memory(idx) => apply::install_memory(&self.store, &discovery.memory[idx]),
        }
    }

    async fn register_mcps(
        &self,
        discovery: &Discovery,
        selected: &[AgentKind],
        versions: &VersionManager,
        options: &SyncOptions,
        summary: &mut SyncSummary,
    ) {
        let Some(manifest) = &discovery.manifest else {
            return;
        };

        for (name, entry) in &manifest.mcp {
            let targets: Vec<AgentKind> = if entry.agents.is_empty() {
                selected
                    .iter()
                    .copied()
                    .filter(|a| a.supports(Capability::Mcp))
                    .collect()
            } else {
                entry
                    .agents
                    .iter()
                    .copied()
                    .filter(|a| selected.contains(a))
                    .collect()
            };

            for agent in targets {
                let home = self.mcp_home(versions, agent, discovery);
                match register_mcp(&self.runner, agent, &home, name, entry).await {
                    Ok(()) => summary.mcp_registered.push(format!("{name} → {agent}")),
                    Err(e) => summary
                        .failures
                        .push((format!("mcp {name} ({agent})"), e.to_string())),
                }
            }
        }

        if options.clean {
            let declared: BTreeSet<&str> = manifest.mcp.keys().map(String::as_str).collect();
            for agent in selected.iter().copied().filter(|a| a.supports(Capability::Mcp)) {
                let home = self.mcp_home(versions, agent, discovery);
                for registered in registered_mcp_names(agent, &home) {
                    if declared.contains(registered.as_str()) {
                        continue;
                    }
                    if let Err(e) = unregister_mcp(&self.runner, agent, &home, &registered).await
                    {
                        summary
                            .failures
                            .push((format!("mcp clean {registered} ({agent})"), e.to_string()));
                    }
                }
            }
        }
    }

    /// HOME an MCP registration lands in: the version's isolated home when
    /// the agent is version-managed for this sync, else the real home.
    fn mcp_home(
        &self,
        versions: &VersionManager,
        agent: AgentKind,
        discovery: &Discovery,
    ) -> PathBuf {
        if let Some(version) = self.active_version(versions, agent, discovery) {
            if versions.is_installed(agent, &version) {
                return versions.home_dir(agent, &version);
            }
        }
        self.user_home.clone()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
