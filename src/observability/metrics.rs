use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub requests_total: IntCounterVec,
    pub request_latency_seconds: HistogramVec,
    pub packages_tracked: IntGauge,
    pub location_resolutions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "soap_requests_total",
                "SOAP requests by endpoint, operation and outcome",
            ),
            &["endpoint", "operation", "outcome"],
        )
        .expect("valid soap_requests_total metric");

        let request_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "soap_request_latency_seconds",
                "Latency of SOAP request handling in seconds",
            ),
            &["endpoint"],
        )
        .expect("valid soap_request_latency_seconds metric");

        let packages_tracked =
            IntGauge::new("packages_tracked", "Packages currently held in memory")
                .expect("valid packages_tracked metric");

        let location_resolutions_total = IntCounterVec::new(
            Opts::new(
                "location_resolutions_total",
                "Address resolutions by match type",
            ),
            &["match_type"],
        )
        .expect("valid location_resolutions_total metric");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("register soap_requests_total");
        registry
            .register(Box::new(request_latency_seconds.clone()))
            .expect("register soap_request_latency_seconds");
        registry
            .register(Box::new(packages_tracked.clone()))
            .expect("register packages_tracked");
        registry
            .register(Box::new(location_resolutions_total.clone()))
            .expect("register location_resolutions_total");

        Self {
            registry,
            requests_total,
            request_latency_seconds,
            packages_tracked,
            location_resolutions_total,
        }
    }

    pub fn record_request(&self, endpoint: &str, operation: &str, outcome: &str, seconds: f64) {
        self.requests_total
            .with_label_values(&[endpoint, operation, outcome])
            .inc();
        self.request_latency_seconds
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
