use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use k1s0_projecthub_server::adapter::handler::{self, AppState};
use k1s0_projecthub_server::adapter::repository::{
    DashboardPostgresRepository, InMemoryStore, ProjectPostgresRepository,
    SettingPostgresRepository, TemplatePostgresRepository, UserPostgresRepository,
    WorkItemPostgresRepository,
};
use k1s0_projecthub_server::domain::repository::{
    DashboardRepository, EmailTemplateRepository, ProjectRepository, SettingRepository,
    UserRepository, WorkItemRepository,
};
use k1s0_projecthub_server::domain::service::MailTransport;
use k1s0_projecthub_server::infrastructure::config::Config;
use k1s0_projecthub_server::infrastructure::delayed_queue::DelayedJobQueue;
use k1s0_projecthub_server::infrastructure::delivery::{LogMailTransport, SmtpMailTransport};
use k1s0_projecthub_server::infrastructure::metrics::Metrics;
use k1s0_projecthub_server::infrastructure::{database, telemetry};
use k1s0_projecthub_server::usecase;

/// Repositories は起動時に選択した永続化層のリポジトリ群。
struct Repositories {
    templates: Arc<dyn EmailTemplateRepository>,
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    work_items: Arc<dyn WorkItemRepository>,
    settings: Arc<dyn SettingRepository>,
    dashboard: Arc<dyn DashboardRepository>,
}

impl Repositories {
    fn postgres(pool: sqlx::PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            templates: Arc::new(TemplatePostgresRepository::new(pool.clone())),
            users: Arc::new(UserPostgresRepository::new(pool.clone())),
            projects: Arc::new(ProjectPostgresRepository::new(pool.clone())),
            work_items: Arc::new(WorkItemPostgresRepository::new(pool.clone())),
            settings: Arc::new(SettingPostgresRepository::new(pool.clone())),
            dashboard: Arc::new(DashboardPostgresRepository::new(pool)),
        }
    }

    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            templates: store.clone(),
            users: store.clone(),
            projects: store.clone(),
            work_items: store.clone(),
            settings: store.clone(),
            dashboard: store,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    // Telemetry
    telemetry::init_telemetry(&cfg.observability)?;

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting projecthub server"
    );

    // Database pool (optional)
    let repos = match database::connect(cfg.database.as_ref()).await? {
        Some(pool) => {
            info!("database connection pool established");
            database::migrate(&pool).await?;
            Repositories::postgres(pool)
        }
        None => {
            info!("no database configured, using in-memory repositories");
            Repositories::in_memory()
        }
    };

    // Mail transport
    let mailer: Arc<dyn MailTransport> = if let Some(ref smtp) = cfg.smtp {
        info!(host = %smtp.host, port = smtp.port, "smtp transport configured");
        Arc::new(SmtpMailTransport::new(smtp)?)
    } else {
        info!("no smtp configured, mail will be logged only");
        Arc::new(LogMailTransport::new())
    };

    let metrics = Arc::new(Metrics::new(&cfg.app.name)?);

    // Delayed queue
    let (queue, queue_worker) = DelayedJobQueue::start(mailer.clone(), metrics.clone(), &cfg.queue);
    info!(
        capacity = cfg.queue.capacity,
        max_attempts = cfg.queue.max_attempts,
        "delayed queue worker started"
    );

    // Use cases
    let dispatcher = Arc::new(usecase::Dispatcher::new(
        mailer,
        Arc::new(queue),
        metrics.clone(),
    ));
    let notify_uc = Arc::new(usecase::NotifyUseCase::new(
        repos.templates.clone(),
        dispatcher,
    ));
    let send_activity_uc = Arc::new(usecase::SendActivityNotificationUseCase::new(
        notify_uc.clone(),
        repos.users.clone(),
        repos.projects.clone(),
        repos.work_items.clone(),
        cfg.site.clone(),
    ));
    let send_schedule_uc = Arc::new(usecase::SendScheduleNotificationUseCase::new(
        notify_uc.clone(),
        repos.users.clone(),
        repos.settings.clone(),
        cfg.site.clone(),
    ));
    let send_account_uc = Arc::new(usecase::SendAccountEmailUseCase::new(
        notify_uc,
        cfg.site.clone(),
    ));

    let state = AppState {
        get_dashboard_uc: Arc::new(usecase::GetDashboardUseCase::new(repos.dashboard.clone())),
        list_templates_uc: Arc::new(usecase::ListTemplatesUseCase::new(repos.templates.clone())),
        get_template_uc: Arc::new(usecase::GetTemplateUseCase::new(repos.templates.clone())),
        update_template_uc: Arc::new(usecase::UpdateTemplateUseCase::new(repos.templates.clone())),
        send_activity_uc,
        send_schedule_uc,
        send_account_uc,
        user_repo: repos.users.clone(),
        metrics,
    };

    // Router
    let app = handler::router(state);

    // REST server
    let host: std::net::IpAddr = cfg.server.host.parse()?;
    let rest_addr = SocketAddr::new(host, cfg.server.port);
    info!("REST server starting on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("REST server stopped, stopping delayed queue");
    queue_worker.shutdown();
    queue_worker.join().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
