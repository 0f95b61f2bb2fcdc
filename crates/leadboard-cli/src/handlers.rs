use std::sync::Arc;

use tokio::sync::mpsc;

use leadboard_core::{AppConfig, SignalBus};
use leadboard_domain::{LeadId, LeadStatus};
use leadboard_store::{CounterSource, LeadStore};
use leadboard_sync::{
    BoardService, CounterIntervals, CounterService, ReconciliationPoller, StatusCoordinator,
};

use crate::context::CounterBinding;
use crate::output::{self, BoardSummary};

pub async fn show_board<S: LeadStore>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let board = BoardService::new(store.clone(), config.banner_ttl());
    let poller = ReconciliationPoller::new(store, config.page_size);
    poller.tick(&board).await?;
    output::output_success(BoardSummary::from_view(&board.board()));
    Ok(())
}

pub async fn move_lead<S: LeadStore>(
    store: Arc<S>,
    id: LeadId,
    status: &str,
) -> anyhow::Result<()> {
    let status: LeadStatus = status.parse()?;
    let coordinator = StatusCoordinator::new(store);
    let updated = coordinator.update_status(id, status, None).await?;
    output::output_success(&updated);
    Ok(())
}

pub async fn show_counters<C: CounterSource>(counters: &[CounterBinding<C>]) -> anyhow::Result<()> {
    let mut values = serde_json::Map::new();
    for (name, _, source) in counters {
        values.insert((*name).to_string(), source.count().await?.into());
    }
    output::output_success(serde_json::Value::Object(values));
    Ok(())
}

/// Keep the board and counters converging until Ctrl-C, printing the board
/// whenever a reconciliation changes it and the badge values on every pass.
pub async fn watch<S, C>(
    store: Arc<S>,
    counters: Vec<CounterBinding<C>>,
    config: &AppConfig,
) -> anyhow::Result<()>
where
    S: LeadStore + 'static,
    C: CounterSource + 'static,
{
    let board = BoardService::new(store.clone(), config.banner_ttl());
    let poller = ReconciliationPoller::new(store, config.page_size);
    poller.tick(&board).await?;

    let mut last = board.board();
    output::output_success(BoardSummary::from_view(&last));

    let bus = SignalBus::new();
    let intervals = CounterIntervals {
        fast: config.fast_poll(),
        slow: config.slow_poll(),
    };

    let mut services = Vec::new();
    let mut shutdowns = Vec::new();
    let mut tasks = Vec::new();
    for (name, triggers, source) in counters {
        let service = Arc::new(CounterService::new(source, intervals).with_triggers(triggers));
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();
        let runner = {
            let service = service.clone();
            let bus = bus.clone();
            tokio::spawn(async move { service.run(&bus, shutdown_rx).await })
        };
        services.push((name, service));
        shutdowns.push(shutdown_tx);
        tasks.push(runner);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(config.reconcile_interval()) => {
                poller.tick(&board).await?;

                let current = board.board();
                if current != last {
                    output::output_success(BoardSummary::from_view(&current));
                    last = current;
                }

                let badges: serde_json::Map<String, serde_json::Value> = services
                    .iter()
                    .map(|(name, service)| ((*name).to_string(), service.value().into()))
                    .collect();
                output::output_success(serde_json::Value::Object(badges));
            }
        }
    }

    // Stop the pollers before the view goes away.
    for shutdown in shutdowns {
        let _ = shutdown.send(());
    }
    for task in tasks {
        let _ = task.await;
    }
    Ok(())
}
