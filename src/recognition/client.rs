//! HTTP client for the classification service
//!
//! Encodes a surface snapshot to PNG on a blocking worker, submits it as
//! a single multipart file field to `{base}/predict/`, and normalizes the
//! JSON response into ranked [`Recognition`] entries.

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use serde::Deserialize;
use tracing::debug;

use super::{Recognition, RecognizeError};
use crate::canvas::SurfaceSnapshot;
use crate::config::RecognitionSettings;

/// Wire format of a successful service response.
///
/// Confidences arrive on a 0-100 scale; `top_5` is ordered by
/// service-assigned rank and usually holds five entries, but any length
/// is accepted.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: String,
    confidence: f32,
    top_5: Vec<PredictEntry>,
}

#[derive(Debug, Deserialize)]
struct PredictEntry {
    class: String,
    confidence: f32,
}

/// Client for the remote classification endpoint
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl RecognitionClient {
    /// Build a client from settings. A missing endpoint is not an error
    /// here; it surfaces on the first recognize call instead of crashing
    /// startup.
    pub fn new(settings: &RecognitionSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = settings
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(Self { http, endpoint })
    }

    /// Encode `snapshot` to PNG and submit it for classification.
    ///
    /// The encode completes before any network traffic; a failed or empty
    /// encode fails fast without touching the network.
    pub async fn recognize(
        &self,
        snapshot: SurfaceSnapshot,
    ) -> Result<Vec<Recognition>, RecognizeError> {
        let endpoint = self.endpoint.clone().ok_or_else(|| {
            RecognizeError::Service("no classification endpoint configured".to_string())
        })?;

        let png = tokio::task::spawn_blocking(move || encode_png(snapshot))
            .await
            .map_err(|e| RecognizeError::Service(format!("encode task failed: {e}")))??;

        if png.is_empty() {
            return Err(RecognizeError::Service(
                "encoded drawing was empty".to_string(),
            ));
        }

        debug!("Submitting {} byte PNG for recognition", png.len());

        let part = reqwest::multipart::Part::bytes(png)
            .file_name("doodle.png")
            .mime_str("image/png")
            .map_err(|e| RecognizeError::Service(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(predict_url(&endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognizeError::Service(format!(
                "service responded with status {status}"
            )));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| RecognizeError::Service(format!("malformed response body: {e}")))?;

        Ok(rank_results(body))
    }
}

/// Join the configured base URL with the predict route. The route carries
/// a trailing slash; the base may or may not.
fn predict_url(base: &str) -> String {
    format!("{}/predict/", base.trim_end_matches('/'))
}

/// Sort transport failures from everything else. Only errors raised
/// before a status line was received land here, so apart from URL
/// construction problems these are connectivity failures.
fn classify_transport(err: reqwest::Error) -> RecognizeError {
    if err.is_builder() {
        RecognizeError::Service(format!("invalid endpoint URL: {err}"))
    } else {
        RecognizeError::Network(err)
    }
}

fn encode_png(snapshot: SurfaceSnapshot) -> Result<Vec<u8>, RecognizeError> {
    let SurfaceSnapshot {
        data,
        width,
        height,
        ..
    } = snapshot;

    let image = RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| RecognizeError::Service("snapshot buffer size mismatch".to_string()))?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| RecognizeError::Service(format!("PNG encode failed: {e}")))?;

    Ok(png.into_inner())
}

/// Normalize the ranking: confidences come down from 0-100 to 0-1 and the
/// service order is preserved exactly; entries are never re-sorted. An
/// empty `top_5` falls back to the top-level prediction so callers always
/// get at least one entry.
fn rank_results(body: PredictResponse) -> Vec<Recognition> {
    if body.top_5.is_empty() {
        return vec![Recognition {
            label: body.prediction,
            confidence: body.confidence / 100.0,
        }];
    }

    body.top_5
        .into_iter()
        .map(|entry| Recognition {
            label: entry.class,
            confidence: entry.confidence / 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn settings(endpoint: Option<String>) -> RecognitionSettings {
        RecognitionSettings {
            endpoint,
            interval_ms: 5000,
            request_timeout_secs: 5,
        }
    }

    fn white_snapshot() -> SurfaceSnapshot {
        SurfaceSnapshot::new(vec![255u8; 8 * 8 * 4], 8, 8)
    }

    #[test]
    fn predict_url_joins_base_without_trailing_slash() {
        assert_eq!(
            predict_url("http://localhost:8000"),
            "http://localhost:8000/predict/"
        );
    }

    #[test]
    fn predict_url_joins_base_with_trailing_slash() {
        assert_eq!(
            predict_url("http://localhost:8000/"),
            "http://localhost:8000/predict/"
        );
    }

    #[test]
    fn ranking_is_normalized_and_order_preserved() {
        let body = PredictResponse {
            prediction: "cat".to_string(),
            confidence: 92.0,
            top_5: vec![
                PredictEntry {
                    class: "cat".to_string(),
                    confidence: 92.0,
                },
                PredictEntry {
                    class: "dog".to_string(),
                    confidence: 41.0,
                },
                PredictEntry {
                    class: "bird".to_string(),
                    confidence: 10.0,
                },
            ],
        };

        let ranked = rank_results(body);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "cat");
        assert!((ranked[0].confidence - 0.92).abs() < 1e-6);
        assert_eq!(ranked[1].label, "dog");
        assert!((ranked[1].confidence - 0.41).abs() < 1e-6);
        assert_eq!(ranked[2].label, "bird");
        assert!((ranked[2].confidence - 0.10).abs() < 1e-6);
    }

    #[test]
    fn ranking_never_resorts_service_order() {
        let body = PredictResponse {
            prediction: "low".to_string(),
            confidence: 5.0,
            top_5: vec![
                PredictEntry {
                    class: "low".to_string(),
                    confidence: 5.0,
                },
                PredictEntry {
                    class: "high".to_string(),
                    confidence: 95.0,
                },
            ],
        };

        let ranked = rank_results(body);
        assert_eq!(ranked[0].label, "low");
        assert_eq!(ranked[1].label, "high");
    }

    #[test]
    fn empty_top_5_falls_back_to_top_prediction() {
        let body = PredictResponse {
            prediction: "cat".to_string(),
            confidence: 92.0,
            top_5: vec![],
        };

        let ranked = rank_results(body);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].label, "cat");
        assert!((ranked[0].confidence - 0.92).abs() < 1e-6);
    }

    #[test]
    fn encode_png_produces_png_bytes() {
        let png = encode_png(white_snapshot()).unwrap();
        assert!(!png.is_empty());
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn encode_png_rejects_mismatched_buffer() {
        let snapshot = SurfaceSnapshot::new(vec![255u8; 16], 8, 8);
        let err = encode_png(snapshot).unwrap_err();
        assert!(matches!(err, RecognizeError::Service(_)));
    }

    #[tokio::test]
    async fn recognize_posts_png_and_parses_ranking() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/predict/")
                    .body_contains("name=\"file\"")
                    .body_contains("doodle.png")
                    .body_contains("PNG");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({
                        "prediction": "cat",
                        "confidence": 92.0,
                        "top_5": [
                            {"class": "cat", "confidence": 92.0},
                            {"class": "dog", "confidence": 41.0},
                            {"class": "bird", "confidence": 10.0},
                        ]
                    }));
            })
            .await;

        let client = RecognitionClient::new(&settings(Some(server.base_url()))).unwrap();
        let ranked = client.recognize(white_snapshot()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "cat");
        assert!((ranked[0].confidence - 0.92).abs() < 1e-6);
    }

    #[tokio::test]
    async fn failure_status_maps_to_service_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/predict/");
                then.status(500);
            })
            .await;

        let client = RecognitionClient::new(&settings(Some(server.base_url()))).unwrap();
        let err = client.recognize(white_snapshot()).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RecognizeError::Service(_)));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_service_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/predict/");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("{\"unexpected\": true}");
            })
            .await;

        let client = RecognitionClient::new(&settings(Some(server.base_url()))).unwrap();
        let err = client.recognize(white_snapshot()).await.unwrap_err();

        assert!(matches!(err, RecognizeError::Service(_)));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        // Nothing listens on the discard port
        let client =
            RecognitionClient::new(&settings(Some("http://127.0.0.1:1".to_string()))).unwrap();
        let err = client.recognize(white_snapshot()).await.unwrap_err();

        assert!(matches!(err, RecognizeError::Network(_)));
    }

    #[tokio::test]
    async fn missing_endpoint_fails_on_first_use_without_network() {
        let client = RecognitionClient::new(&settings(None)).unwrap();
        let err = client.recognize(white_snapshot()).await.unwrap_err();

        assert!(matches!(err, RecognizeError::Service(_)));
    }

    #[tokio::test]
    async fn blank_endpoint_is_treated_as_missing() {
        let client = RecognitionClient::new(&settings(Some("   ".to_string()))).unwrap();
        let err = client.recognize(white_snapshot()).await.unwrap_err();

        assert!(matches!(err, RecognizeError::Service(_)));
    }
}
