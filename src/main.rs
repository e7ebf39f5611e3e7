use anyhow::Result;
use diskpulse::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let collectors = &app_config.collectors;

    let health: Option<Arc<dyn sources::HealthSource>> = if collectors.smart_enabled {
        Some(Arc::new(smart_repo::SmartctlRepo::new(
            collectors.smartctl_path.clone(),
        )))
    } else {
        tracing::info!("SMART disabled; publishing rates without health data");
        None
    };
    let service = Arc::new(service::DiskStatsService::new(service::ServiceDeps {
        inventory: Arc::new(volume_repo::VolumeRepo::new(&collectors.sysfs_path)),
        counters: Arc::new(volume_repo::SysfsCounters::new(&collectors.sysfs_path)),
        health,
    }));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        service.clone(),
        worker::WorkerConfig::default(),
        shutdown_rx,
    );

    let app = routes::app(service);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}
