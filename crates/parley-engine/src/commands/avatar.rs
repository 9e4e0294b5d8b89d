//! Group avatar update pipeline.
//!
//! ## Steps (in order):
//! 1. Plan: snapshot the current image, detect whether anything changes,
//!    feature-gate uploads, validate the request
//! 2. Stage: upload the new file (uploads only)
//! 3. Commit: persist the new image reference without touching `updated_at`
//! 4. Cleanup: delete the previous file unless it is a protected default
//! 5. Respond: project the full settings resource
//! 6. Notify: broadcast to present participants, then emit the domain event
//!
//! No-op requests stop after step 1 and go straight to step 5. The commit is
//! the point of no return: anything before it aborts the whole request and
//! leaves no persisted change, anything after it is reported and swallowed.

use std::time::{Duration, Instant};

use parley_core::config::MessengerConfig;
use parley_core::errors::{ParleyError, Result};
use parley_core::model::{AssetDirectory, AssetPath, AvatarChange, DomainEvent, Provider, Thread};
use parley_core::ports::{
    AssetStore, BroadcastDriver, EntityStore, ErrorReporter, EventDispatcher, Feature,
    FeatureFlags, PresenceChannel, ThreadUpdate, UpdateOptions,
};
use parley_core::render::{
    thread_settings_broadcast, thread_settings_resource, ThreadSettingsBroadcast,
    ThreadSettingsResource,
};
use parley_core::routes::Routes;
use parley_core::rules::change_detection::{avatar_changed, cleanup_target};
use parley_core::rules::validation::validate_avatar_change;
use parley_core_types::RequestContext;

use crate::commands::report_best_effort;

const OP: &str = "update_group_avatar";

/// Realtime event name pushed to the thread's presence channel
pub const AVATAR_BROADCAST_EVENT: &str = "thread.avatar";

/// Who is acting, under which request, and until when
#[derive(Debug, Clone)]
pub struct MutationContext {
    pub actor: Provider,
    pub request: RequestContext,
    /// Work not committed by this instant is abandoned
    pub deadline: Option<Instant>,
}

impl MutationContext {
    pub fn new(actor: Provider) -> Self {
        Self {
            actor,
            request: RequestContext::new(),
            deadline: None,
        }
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn check_deadline(&self, step: &str) -> Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ParleyError::Timeout {
                op: format!("{}.{}", OP, step),
            }),
            _ => Ok(()),
        }
    }
}

/// Collaborators the pipeline talks to
#[derive(Clone, Copy)]
pub struct AvatarDeps<'a> {
    pub threads: &'a dyn EntityStore,
    pub assets: &'a dyn AssetStore,
    pub broadcaster: &'a dyn BroadcastDriver,
    pub events: &'a dyn EventDispatcher,
    pub flags: &'a dyn FeatureFlags,
    pub reporter: &'a dyn ErrorReporter,
    pub config: &'a MessengerConfig,
    pub routes: &'a Routes,
}

/// Result handed back to the request layer
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarOutcome {
    pub changed: bool,
    /// Thread state after the call
    pub thread: Thread,
    pub resource: ThreadSettingsResource,
    /// What was pushed to present participants; `None` for a no-op
    pub broadcast: Option<ThreadSettingsBroadcast>,
}

/// Output of the planning step
#[derive(Debug)]
struct AvatarPlan {
    original: Option<String>,
    change: AvatarChange,
    changed: bool,
}

/// New image reference, plus the file written for it if any
#[derive(Debug)]
struct Staged {
    image: String,
    uploaded: Option<AssetPath>,
}

/// Replace a group thread's avatar.
///
/// `thread` is updated in place once the new reference is committed.
///
/// # Errors
///
/// - `InvalidAvatar` for private threads or requests failing validation
/// - `FeatureDisabled` for uploads while avatar uploads are switched off
/// - `Storage` if the upload fails
/// - `Timeout` if the deadline passes before the commit
/// - Any entity store error from the commit
///
/// Cleanup and delivery failures are reported through `deps.reporter` and
/// never returned.
pub fn update_group_avatar(
    thread: &mut Thread,
    change: AvatarChange,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) -> Result<AvatarOutcome> {
    let start = Instant::now();
    parley_core::log_op_start!(
        OP,
        thread_id = thread.id.as_str(),
        provider_id = ctx.actor.id.as_str(),
        request_id = ctx.request.request_id.as_str()
    );

    let result = run_pipeline(thread, change, ctx, deps);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(outcome) => {
            parley_core::log_op_end!(
                OP,
                duration_ms = duration_ms,
                thread_id = thread.id.as_str(),
                changed = outcome.changed
            );
        }
        Err(e) => {
            parley_core::log_op_error!(
                OP,
                e.clone(),
                duration_ms = duration_ms,
                thread_id = thread.id.as_str()
            );
        }
    }

    result
}

fn run_pipeline(
    thread: &mut Thread,
    change: AvatarChange,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) -> Result<AvatarOutcome> {
    let plan = plan(thread, change, deps)?;

    if !plan.changed {
        return Ok(AvatarOutcome {
            changed: false,
            thread: thread.clone(),
            resource: thread_settings_resource(thread, deps.routes),
            broadcast: None,
        });
    }

    let directory = thread.avatar_directory(&deps.config.storage.threads_disk);
    let staged = stage(plan.change, &directory, ctx, deps)?;
    commit(thread, staged, ctx, deps)?;
    cleanup(thread, plan.original.as_deref(), &directory, ctx, deps);

    let resource = thread_settings_resource(thread, deps.routes);
    let broadcast = notify(thread, ctx, deps);

    Ok(AvatarOutcome {
        changed: true,
        thread: thread.clone(),
        resource,
        broadcast: Some(broadcast),
    })
}

fn plan(thread: &Thread, change: AvatarChange, deps: &AvatarDeps<'_>) -> Result<AvatarPlan> {
    if !thread.is_group() {
        return Err(ParleyError::InvalidAvatar {
            reason: "only group threads have an avatar".to_string(),
        });
    }

    if matches!(change, AvatarChange::Upload(_))
        && !deps.flags.is_enabled(Feature::ThreadAvatarUpload)
    {
        return Err(ParleyError::FeatureDisabled {
            message: "Group avatar uploads are currently disabled.".to_string(),
        });
    }

    validate_avatar_change(&change, deps.config)?;

    let changed = avatar_changed(thread.image.as_deref(), &change);
    Ok(AvatarPlan {
        original: thread.image.clone(),
        change,
        changed,
    })
}

fn stage(
    change: AvatarChange,
    directory: &AssetDirectory,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) -> Result<Staged> {
    ctx.check_deadline("upload")?;

    match change {
        AvatarChange::Default(image) => Ok(Staged {
            image,
            uploaded: None,
        }),
        AvatarChange::Upload(upload) => {
            let file_name = deps.assets.upload(&upload, directory)?;
            let uploaded = directory.file(&file_name);
            tracing::debug!(asset_path = %uploaded, "avatar uploaded");
            Ok(Staged {
                image: file_name,
                uploaded: Some(uploaded),
            })
        }
    }
}

fn commit(
    thread: &mut Thread,
    staged: Staged,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) -> Result<()> {
    let persisted = ctx.check_deadline("commit").and_then(|()| {
        deps.threads.update(
            &thread.id,
            &ThreadUpdate::Image(staged.image.clone()),
            UpdateOptions { skip_audit: true },
        )
    });

    if let Err(e) = persisted {
        // Nothing references the fresh upload; drop it
        if let Some(uploaded) = &staged.uploaded {
            if let Err(discard) = deps.assets.delete(uploaded) {
                report_best_effort(
                    deps.reporter,
                    &ctx.request,
                    &thread.id,
                    ParleyError::CleanupFailed {
                        path: uploaded.to_string(),
                        message: discard.to_string(),
                    },
                );
            }
        }
        return Err(e);
    }

    thread.image = Some(staged.image);
    Ok(())
}

fn cleanup(
    thread: &Thread,
    original: Option<&str>,
    directory: &AssetDirectory,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) {
    let Some(old) = cleanup_target(original, deps.config) else {
        return;
    };

    let path = directory.file(old);
    if let Err(e) = deps.assets.delete(&path) {
        report_best_effort(
            deps.reporter,
            &ctx.request,
            &thread.id,
            ParleyError::CleanupFailed {
                path: path.to_string(),
                message: e.to_string(),
            },
        );
    }
}

fn notify(
    thread: &Thread,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) -> ThreadSettingsBroadcast {
    let broadcast = thread_settings_broadcast(thread, &ctx.actor, deps.routes);
    let channel = PresenceChannel::for_thread(&thread.id);

    let sent = serde_json::to_value(&broadcast)
        .map_err(ParleyError::from)
        .and_then(|payload| {
            deps.broadcaster
                .send_to_presence(&channel, AVATAR_BROADCAST_EVENT, &payload)
        });
    if let Err(e) = sent {
        report_delivery(thread, channel.as_str(), e, ctx, deps);
    }

    // Listeners get the stored state, not our in-memory copy
    let emitted = deps.threads.get(&thread.id).and_then(|fresh| {
        deps.events.dispatch(DomainEvent::ThreadAvatar {
            provider: ctx.actor.without_relations(),
            thread: fresh,
        })
    });
    if let Err(e) = emitted {
        report_delivery(thread, "thread_avatar", e, ctx, deps);
    }

    broadcast
}

fn report_delivery(
    thread: &Thread,
    target: &str,
    err: ParleyError,
    ctx: &MutationContext,
    deps: &AvatarDeps<'_>,
) {
    let err = match err {
        delivery @ ParleyError::DeliveryFailed { .. } => delivery,
        other => ParleyError::DeliveryFailed {
            target: target.to_string(),
            message: other.to_string(),
        },
    };
    report_best_effort(deps.reporter, &ctx.request, &thread.id, err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_deadline_is_timeout() {
        let ctx = MutationContext::new(Provider::new("u-1", "user", "Ada"))
            .with_deadline(Instant::now());
        let err = ctx.check_deadline("upload").unwrap_err();
        assert_eq!(
            err,
            ParleyError::Timeout {
                op: "update_group_avatar.upload".to_string()
            }
        );
    }

    #[test]
    fn test_no_deadline_never_times_out() {
        let ctx = MutationContext::new(Provider::new("u-1", "user", "Ada"));
        assert!(ctx.check_deadline("commit").is_ok());
    }

    #[test]
    fn test_generous_timeout_passes() {
        let ctx = MutationContext::new(Provider::new("u-1", "user", "Ada"))
            .with_timeout(Duration::from_secs(60));
        assert!(ctx.check_deadline("commit").is_ok());
    }
}
