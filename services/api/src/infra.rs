use deep_interview::auth::AdminAuth;
use deep_interview::chat::InterviewService;
use deep_interview::config::{AdminConfig, AppConfig};
use deep_interview::interview::{InterviewManager, InterviewScript};
use deep_interview::store::{InMemoryAnswerRepository, InMemoryCandidateRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Interviews = InterviewService<InMemoryCandidateRepository, InMemoryAnswerRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
    pub(crate) interviews: Arc<Interviews>,
    pub(crate) auth: Arc<AdminAuth>,
    pub(crate) rate_per_minute: f64,
}

impl AppState {
    pub(crate) fn new(admin: &AdminConfig, rate_per_minute: f64) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: None,
            interviews: Arc::new(in_memory_interviews()),
            auth: Arc::new(AdminAuth::new(admin)),
            rate_per_minute,
        }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.admin, config.interview.rate_per_minute)
    }

    pub(crate) fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(Arc::new(handle));
        self
    }

    pub(crate) fn script(&self) -> &InterviewScript {
        self.interviews.manager().script()
    }
}

pub(crate) fn in_memory_interviews() -> Interviews {
    let candidates = Arc::new(InMemoryCandidateRepository::default());
    let answers = Arc::new(InMemoryAnswerRepository::default());
    let manager = Arc::new(InterviewManager::new(InterviewScript::standard()));
    InterviewService::new(candidates, answers, manager)
}
