//! Side-effect requests the reducer schedules instead of performing I/O
//! itself (`spec.md` §4.6: "cmds is a list of side-effect requests ...
//! executed by the runtime after the reducer returns; they may produce
//! future messages"). Grounded on `engine/runner.rs`'s "spawn a tokio task,
//! post results back" idiom, generalized from one execution to a small
//! fixed set of command kinds.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::adapters::azure_cli;
use crate::adapters::llm::LlmClient;
use crate::engine::{aggregate, dispatch};
use crate::model::actions::ActionKind;
use crate::model::entities::Resource;

use super::messages::Msg;

#[derive(Clone)]
pub enum Cmd {
    LoadSubscriptions,
    LoadGroups { subscription_id: String },
    LoadGroupChildren { subscription_id: String, group_name: String },
    RunDashboard { resource_id: String, subscription_id: String, cancel: CancellationToken },
    RunAction { tab_id: String, resource: Box<Resource>, kind: ActionKind },
    RunAi { client: Arc<LlmClient>, tab_id: String, resource_id: String, prompt: String, context: String },
}

/// Spawn a background task for `cmd` that posts its result(s) to `tx`.
/// Never called from inside the reducer — only by the runtime loop after
/// the reducer returns (`spec.md` §4.6 "Suspension points").
pub fn spawn(cmd: Cmd, tx: UnboundedSender<Msg>) {
    match cmd {
        Cmd::LoadSubscriptions => {
            tokio::spawn(async move {
                let result = azure_cli::list_subscriptions().await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::SubsLoaded(result));
            });
        }
        Cmd::LoadGroups { subscription_id } => {
            tokio::spawn(async move {
                let result = azure_cli::list_resource_groups(&subscription_id).await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::GroupsLoaded { subscription_id, result });
            });
        }
        Cmd::LoadGroupChildren { subscription_id, group_name } => {
            tokio::spawn(async move {
                match azure_cli::list_resources_in_group(&subscription_id, &group_name).await {
                    Ok(items) => {
                        let _ = tx.send(Msg::GroupChildrenLoaded { subscription_id, group_name, items, err: None });
                    }
                    Err(e) => {
                        let _ = tx.send(Msg::GroupChildrenLoaded {
                            subscription_id,
                            group_name,
                            items: Vec::new(),
                            err: Some(e.to_string()),
                        });
                    }
                }
            });
        }
        Cmd::RunDashboard { resource_id, subscription_id, cancel } => {
            tokio::spawn(async move {
                let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel();
                let resource_id_for_frames = resource_id.clone();
                let frame_forwarder = {
                    let tx = tx.clone();
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        loop {
                            tokio::select! {
                                _ = cancel.cancelled() => break,
                                frame = progress_rx.recv() => {
                                    let Some(frame) = frame else { break };
                                    let _ = tx.send(Msg::DashboardProgress(frame));
                                }
                            }
                        }
                    })
                };
                // Optional cancellation per `spec.md` §4.6; the aggregation
                // still runs to completion under its own deadlines if this
                // never fires.
                tokio::select! {
                    _ = cancel.cancelled() => {
                        frame_forwarder.abort();
                    }
                    snapshot = aggregate::aggregate(resource_id.clone(), subscription_id, progress_tx) => {
                        let _ = frame_forwarder.await;
                        let _ = tx.send(Msg::DashboardLoaded { resource_id: resource_id_for_frames, snapshot });
                    }
                }
            });
        }
        Cmd::RunAction { tab_id, resource, kind } => {
            tokio::spawn(async move {
                let resource_id = resource.id.clone();
                let result = dispatch::dispatch(&resource, kind).await.map_err(|e| e.to_string());
                let _ = tx.send(Msg::ActionResult { tab_id, resource_id, outcome: result });
            });
        }
        Cmd::RunAi { client, tab_id, resource_id, prompt, context } => {
            tokio::spawn(async move {
                let result = client.ask(&prompt, &context).await;
                let (text, err) = match result {
                    Ok(t) => (Some(t), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                let _ = tx.send(Msg::AiResponse { tab_id, resource_id, text, err });
            });
        }
    }
}
