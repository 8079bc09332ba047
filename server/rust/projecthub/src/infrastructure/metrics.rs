use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Metrics は projecthub サーバーの Prometheus メトリクスを保持する。
/// 呼び出し元へ返さずに握りつぶした配信失敗もここで数える。
pub struct Metrics {
    notifications_total: IntCounterVec,
    dashboard_requests_total: IntCounter,
    queue_jobs_total: IntCounterVec,
    registry: Registry,
}

impl Metrics {
    /// service_name はメトリクスの service ラベルに使用される。
    pub fn new(service_name: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let notifications_total = IntCounterVec::new(
            Opts::new(
                "projecthub_notifications_total",
                "Total number of notification dispatches per recipient",
            )
            .const_label("service", service_name),
            &["template_type", "mode", "outcome"],
        )?;

        let dashboard_requests_total = IntCounter::with_opts(
            Opts::new(
                "projecthub_dashboard_requests_total",
                "Total number of dashboard snapshots built",
            )
            .const_label("service", service_name),
        )?;

        let queue_jobs_total = IntCounterVec::new(
            Opts::new(
                "projecthub_queue_jobs_total",
                "Total number of delayed mail jobs processed by the in-process queue",
            )
            .const_label("service", service_name),
            &["outcome"],
        )?;

        registry.register(Box::new(notifications_total.clone()))?;
        registry.register(Box::new(dashboard_requests_total.clone()))?;
        registry.register(Box::new(queue_jobs_total.clone()))?;

        Ok(Self {
            notifications_total,
            dashboard_requests_total,
            queue_jobs_total,
            registry,
        })
    }

    pub fn record_notification(&self, template_type: &str, mode: &str, outcome: &str) {
        self.notifications_total
            .with_label_values(&[template_type, mode, outcome])
            .inc();
    }

    pub fn notification_count(&self, template_type: &str, mode: &str, outcome: &str) -> u64 {
        self.notifications_total
            .with_label_values(&[template_type, mode, outcome])
            .get()
    }

    pub fn record_dashboard_request(&self) {
        self.dashboard_requests_total.inc();
    }

    /// outcome は "delivered" / "retried" / "failed" のいずれか。
    pub fn record_queue_job(&self, outcome: &str) {
        self.queue_jobs_total.with_label_values(&[outcome]).inc();
    }

    pub fn queue_job_count(&self, outcome: &str) -> u64 {
        self.queue_jobs_total.with_label_values(&[outcome]).get()
    }

    /// gather_metrics は Prometheus テキストフォーマットでメトリクスを返す。
    pub fn gather_metrics(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
