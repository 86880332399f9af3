use super::{archive, SynthesisClient, SynthesisError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Fixed synthesis parameters, matched to the provider's async T2A endpoint
const MODEL: &str = "speech-02-hd";
const VOICE_ID: &str = "Chinese (Mandarin)_Warm_Bestie";
const SPEED: f64 = 0.8;
const VOL: f64 = 1.0;
const PITCH: i32 = 0;
const AUDIO_SAMPLE_RATE: u32 = 32000;
const BITRATE: u32 = 128_000;
const AUDIO_FORMAT: &str = "mp3";
const CHANNEL: u32 = 1;

/// MiniMax async text-to-speech client.
///
/// One `synthesize` call drives the provider's whole workflow: submit the
/// task, poll until a terminal status, exchange the file id for a short-lived
/// download URL, fetch the tar container and extract the audio payload.
pub struct MiniMaxClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

#[derive(Debug, Serialize)]
struct T2aRequest<'a> {
    model: &'a str,
    text: &'a str,
    voice_setting: VoiceSetting<'a>,
    audio_setting: AudioSetting<'a>,
}

#[derive(Debug, Serialize)]
struct VoiceSetting<'a> {
    voice_id: &'a str,
    speed: f64,
    vol: f64,
    pitch: i32,
}

#[derive(Debug, Serialize)]
struct AudioSetting<'a> {
    audio_sample_rate: u32,
    bitrate: u32,
    format: &'a str,
    channel: u32,
}

#[derive(Debug, Default, Deserialize)]
struct BaseResp {
    #[serde(default)]
    status_code: i32,
    #[serde(default)]
    status_msg: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    base_resp: BaseResp,
    #[serde(default)]
    task_id: i64,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    base_resp: BaseResp,
    #[serde(default)]
    status: String,
    #[serde(default)]
    file_id: i64,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    base_resp: BaseResp,
    #[serde(default)]
    file: RetrievedFile,
}

#[derive(Debug, Default, Deserialize)]
struct RetrievedFile {
    #[serde(default)]
    download_url: String,
}

fn ensure_ok(base: BaseResp) -> Result<(), SynthesisError> {
    if base.status_code != 0 {
        return Err(SynthesisError::Provider {
            code: base.status_code,
            message: base.status_msg,
        });
    }
    Ok(())
}

impl MiniMaxClient {
    pub fn new(
        base_url: String,
        api_key: String,
        poll_interval: Duration,
        poll_max_attempts: u32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            poll_interval,
            poll_max_attempts,
        }
    }

    async fn submit(&self, text: &str) -> Result<i64, SynthesisError> {
        let body = T2aRequest {
            model: MODEL,
            text,
            voice_setting: VoiceSetting {
                voice_id: VOICE_ID,
                speed: SPEED,
                vol: VOL,
                pitch: PITCH,
            },
            audio_setting: AudioSetting {
                audio_sample_rate: AUDIO_SAMPLE_RATE,
                bitrate: BITRATE,
                format: AUDIO_FORMAT,
                channel: CHANNEL,
            },
        };

        let response: SubmitResponse = self
            .http
            .post(format!("{}/v1/t2a_async_v2", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        ensure_ok(response.base_resp)?;
        Ok(response.task_id)
    }

    /// Poll task status until the provider reports a terminal state. The loop
    /// is bounded; running out of attempts is distinguishable from a
    /// provider-reported failure.
    async fn await_completion(&self, task_id: i64) -> Result<i64, SynthesisError> {
        for attempt in 1..=self.poll_max_attempts {
            let response: QueryResponse = self
                .http
                .get(format!("{}/v1/query/t2a_async_query_v2", self.base_url))
                .query(&[("task_id", task_id.to_string())])
                .bearer_auth(&self.api_key)
                .send()
                .await?
                .json()
                .await?;

            ensure_ok(response.base_resp)?;

            match response.status.as_str() {
                "Success" => return Ok(response.file_id),
                "Failed" => return Err(SynthesisError::TaskFailed),
                status => {
                    tracing::debug!(task_id, attempt, status, "speech task still running");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Err(SynthesisError::PollTimeout {
            attempts: self.poll_max_attempts,
        })
    }

    async fn download_url(&self, file_id: i64) -> Result<String, SynthesisError> {
        let response: RetrieveResponse = self
            .http
            .get(format!("{}/v1/files/retrieve", self.base_url))
            .query(&[("file_id", file_id.to_string())])
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .json()
            .await?;

        ensure_ok(response.base_resp)?;
        Ok(response.file.download_url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SynthesisError> {
        // The URL is pre-signed; no auth header on this request
        let bytes = self.http.get(url).send().await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SynthesisClient for MiniMaxClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let task_id = self.submit(text).await?;
        tracing::info!(task_id, text_length = text.len(), "speech task submitted");

        let file_id = self.await_completion(task_id).await?;
        tracing::info!(task_id, file_id, "speech task succeeded");

        let download_url = self.download_url(file_id).await?;
        let container = self.download(&download_url).await?;
        tracing::debug!(
            task_id,
            archive_size = container.len(),
            "audio container downloaded"
        );

        let audio =
            archive::extract_audio(&container, AUDIO_FORMAT)?.ok_or(SynthesisError::MissingAudio)?;
        Ok(audio)
    }
}
