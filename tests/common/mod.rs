#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nour_al_qalb::catalog::Catalog;
use nour_al_qalb::errors::PipelineError;
use nour_al_qalb::pipeline::{Pipeline, PipelineSettings};
use nour_al_qalb::provider::Provider;

pub const SCENARIO_ONE: &str = "Texte arabe: X\nTranslitération: Y\nTraduction: Z\nSource: Sahih al-Bukhari\nThèmes: protection\nContexte: C\nBienfaits: a, b\nOccasions: o1, o2";

/// Replays queued outcomes in order and counts calls. Repeats the last outcome once the queue is drained.
pub struct Scripted {
    outcomes: Mutex<VecDeque<Result<String, PipelineError>>>,
    last: Mutex<Option<Result<String, PipelineError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn new(outcomes: Vec<Result<String, PipelineError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            last: Mutex::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(err: PipelineError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }

    /// Never answers within any sensible deadline.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            last: Mutex::new(Some(Ok("late".to_string()))),
            delay: Some(Duration::from_secs(3600)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(PipelineError::Service("script exhausted".into()))),
        }
    }
}

pub fn pipeline(provider: Arc<Scripted>) -> Pipeline {
    pipeline_with(provider, PipelineSettings::default())
}

pub fn pipeline_with(provider: Arc<Scripted>, settings: PipelineSettings) -> Pipeline {
    Pipeline::new(provider, settings).with_catalog(Arc::new(Catalog::load().unwrap()))
}
