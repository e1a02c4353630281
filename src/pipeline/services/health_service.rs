use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower::Service;

use crate::error::{AnalysisError, Result};
use crate::pipeline::pipeline::PlantHealthAnalyzer;
use crate::pipeline::types::{AnalysisReport, DiagnosisResult, EncodedImage};

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

// The analysis is CPU-bound; keep it off the async workers
fn run_blocking<T, F>(analyzer: Arc<PlantHealthAnalyzer>, job: F) -> BoxFuture<T>
where
    T: Send + 'static,
    F: FnOnce(&PlantHealthAnalyzer) -> Result<T> + Send + 'static,
{
    Box::pin(async move {
        tokio::task::spawn_blocking(move || job(&analyzer))
            .await
            .map_err(|e| AnalysisError::processing(format!("analysis task failed: {e}")))?
    })
}

/// tower adapter returning the two-field record; analysis errors come back as error records
#[derive(Clone)]
pub struct PlantHealthService {
    analyzer: Arc<PlantHealthAnalyzer>,
}

impl PlantHealthService {
    pub fn new(analyzer: Arc<PlantHealthAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl Service<String> for PlantHealthService {
    type Response = DiagnosisResult;
    type Error = AnalysisError;
    type Future = BoxFuture<DiagnosisResult>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, payload: String) -> Self::Future {
        run_blocking(self.analyzer.clone(), move |analyzer| {
            Ok(analyzer.analyze(&payload))
        })
    }
}

/// tower adapter returning the full report; analysis errors stay `Err`
#[derive(Clone)]
pub struct PlantHealthReportService {
    analyzer: Arc<PlantHealthAnalyzer>,
}

impl PlantHealthReportService {
    pub fn new(analyzer: Arc<PlantHealthAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl Service<String> for PlantHealthReportService {
    type Response = AnalysisReport;
    type Error = AnalysisError;
    type Future = BoxFuture<AnalysisReport>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, payload: String) -> Self::Future {
        run_blocking(self.analyzer.clone(), move |analyzer| {
            analyzer.analyze_report(&EncodedImage::new(payload))
        })
    }
}
