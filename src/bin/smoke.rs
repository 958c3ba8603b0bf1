// src/bin/smoke.rs
// Runs the upload -> list -> vote round trip against a running deployment.
//
// Usage: smoke [BASE_URL]   (default: $HOTSPOT_API_URL or http://localhost:8000)
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// 1x1 transparent PNG
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const LOCATION: &str = "The Pit";
const UPLOADER: &str = "u1";
const VOTER: &str = "u2";

#[derive(Deserialize, Debug)]
struct PhotoSummary {
    id: String,
    user_id: String,
    location_name: String,
    upvotes: i32,
    downvotes: i32,
    #[serde(default)]
    user_vote: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UploadResponse {
    status: String,
    photo: PhotoSummary,
}

#[derive(Deserialize, Debug)]
struct VoteResponse {
    status: String,
    upvotes: i32,
    downvotes: i32,
}

struct SmokeRunner {
    base_url: Url,
    client: Client,
}

impl SmokeRunner {
    fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid URL {}", base_url))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_liveness(&self) -> Result<()> {
        let resp = self.client.get(self.url(&[])?).send().await?;
        if !resp.status().is_success() {
            bail!("liveness check returned HTTP {}", resp.status());
        }
        Ok(())
    }

    async fn upload(&self) -> Result<PhotoSummary> {
        let form = Form::new()
            .text("user_id", UPLOADER)
            .text("location_name", LOCATION)
            .text("title", "smoke test")
            .text("description", "uploaded by the smoke tool")
            .text("latitude", "35.9101")
            .text("longitude", "-79.0486")
            .part(
                "file",
                Part::bytes(PIXEL_PNG.to_vec())
                    .file_name("smoke.png")
                    .mime_str("image/png")?,
            );

        let resp = self
            .client
            .post(self.url(&["upload"])?)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP {} - {}", status, resp.text().await.unwrap_or_default());
        }

        let body: UploadResponse = resp.json().await.context("unexpected upload response")?;
        if body.status != "success" {
            bail!("upload status was '{}'", body.status);
        }
        Ok(body.photo)
    }

    async fn list(&self, segments: &[&str], viewer: Option<&str>) -> Result<Vec<PhotoSummary>> {
        let mut request = self.client.get(self.url(segments)?);
        if let Some(viewer) = viewer {
            request = request.query(&[("viewer_id", viewer)]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP {} - {}", status, resp.text().await.unwrap_or_default());
        }
        resp.json().await.context("unexpected listing response")
    }

    async fn vote(&self, photo_id: &str, vote_type: &str) -> Result<VoteResponse> {
        let resp = self
            .client
            .post(self.url(&["vote"])?)
            .json(&serde_json::json!({
                "photo_id": photo_id,
                "user_id": VOTER,
                "vote_type": vote_type,
            }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP {} - {}", status, resp.text().await.unwrap_or_default());
        }
        resp.json().await.context("unexpected vote response")
    }

    async fn run(&self) -> Result<()> {
        step("Liveness", self.check_liveness()).await?;

        let photo = step("Upload", self.upload()).await?;
        println!("   photo id: {}", photo.id);

        let listed = step(
            "List location",
            self.list(&["locations", LOCATION, "photos"], None),
        )
        .await?;
        let found = listed
            .iter()
            .find(|p| p.id == photo.id)
            .context("uploaded photo missing from location listing")?;
        if found.user_id != UPLOADER || found.location_name != LOCATION {
            bail!("listed photo has wrong metadata: {:?}", found);
        }
        if (found.upvotes, found.downvotes) != (0, 0) {
            bail!("new photo has counters {}/{}", found.upvotes, found.downvotes);
        }

        let outcome = step("Vote up", self.vote(&photo.id, "up")).await?;
        if outcome.status != "success" || (outcome.upvotes, outcome.downvotes) != (1, 0) {
            bail!(
                "expected success with 1/0, got {} with {}/{}",
                outcome.status,
                outcome.upvotes,
                outcome.downvotes
            );
        }

        let mine = step(
            "List uploader",
            self.list(&["users", UPLOADER, "photos"], Some(VOTER)),
        )
        .await?;
        let found = mine
            .iter()
            .find(|p| p.id == photo.id)
            .context("uploaded photo missing from user listing")?;
        if found.user_vote.as_deref() != Some("up") {
            bail!("viewer vote shows as {:?}", found.user_vote);
        }

        Ok(())
    }
}

async fn step<T, F>(name: &str, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let started = Instant::now();
    print!("{}▶ {}...{} ", CYAN, name, RESET);
    let result = fut.await;
    let elapsed = started.elapsed().as_secs_f64();
    match &result {
        Ok(_) => println!("{}ok{} ({:.2}s)", GREEN, RESET, elapsed),
        Err(_) => println!("{}failed{} ({:.2}s)", RED, RESET, elapsed),
    }
    result.with_context(|| format!("{} failed", name))
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let base_url = env::args()
        .nth(1)
        .or_else(|| env::var("HOTSPOT_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    println!("{}Hotspot smoke test against {}{}", BOLD, base_url, RESET);
    println!(
        "{}Note: this writes a real photo and vote to the deployment.{}",
        YELLOW, RESET
    );

    let runner = match SmokeRunner::new(&base_url) {
        Ok(runner) => runner,
        Err(e) => {
            println!("{}❌ {:#}{}", RED, e, RESET);
            process::exit(2);
        }
    };

    match runner.run().await {
        Ok(()) => println!("\n{}✅ All checks passed{}", GREEN, RESET),
        Err(e) => {
            println!("\n{}❌ {:#}{}", RED, e, RESET);
            process::exit(1);
        }
    }
}
