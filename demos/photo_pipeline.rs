// Photo pipeline walkthrough: synthetic camera -> capture -> PNG data URL
//
// Runs the whole capture path against a generated test pattern, saves the
// download artifact next to the working directory, and optionally forwards
// it to a running gateway.
//
// Usage:
//   cargo run --example photo_pipeline
//   RELAY_URL=http://localhost:3001 RECIPIENT=you@example.com \
//     cargo run --example photo_pipeline
//
// The forwarding step needs a gateway started separately:
//   SMTP_USER=... SMTP_APP_PASSWORD=... SENDER_EMAIL=... cargo run -- gateway

use anyhow::Result;
use snapmail::capture::{
    DeviceError, MediaSource, MediaStream, PhotoSession, RawFrame, StreamConstraints,
};
use snapmail::RelayClient;
use tracing::info;

/// Camera stand-in producing a fixed gradient pattern
struct PatternCamera;

impl MediaSource for PatternCamera {
    fn acquire(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        Ok(Box::new(PatternStream {
            width: constraints.ideal_width.min(320),
            height: constraints.ideal_height.min(180),
            live: true,
        }))
    }
}

struct PatternStream {
    width: u32,
    height: u32,
    live: bool,
}

impl MediaStream for PatternStream {
    fn grab_frame(&mut self) -> Result<RawFrame, DeviceError> {
        if !self.live {
            return Err(DeviceError::Stream("stream stopped".to_string()));
        }

        let mut rgba = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                rgba.push((x * 255 / self.width) as u8);
                rgba.push((y * 255 / self.height) as u8);
                rgba.push(128);
                rgba.push(255);
            }
        }

        Ok(RawFrame {
            width: self.width,
            height: self.height,
            rgba,
        })
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let camera = PatternCamera;
    let mut session = PhotoSession::new();

    // 1. Acquire the camera and grab a frame
    session.start(&camera)?;
    let data_url = session.capture()?.to_string();
    info!("Captured photo ({} chars as data URL)", data_url.len());

    // 2. Local save path
    let download = session.download()?;
    std::fs::write(&download.filename, &download.bytes)?;
    info!(
        "Saved {} ({} bytes)",
        download.filename,
        download.bytes.len()
    );

    // 3. Optional forwarding through a running gateway
    match (std::env::var("RELAY_URL"), std::env::var("RECIPIENT")) {
        (Ok(relay_url), Ok(recipient)) => {
            let relay = RelayClient::new(relay_url);
            session
                .email(
                    &relay,
                    &recipient,
                    "Here is the photo I captured!",
                )
                .await?;
            info!("Photo emailed to {recipient}");
        }
        _ => {
            info!("Set RELAY_URL and RECIPIENT to forward the photo to a gateway");
        }
    }

    session.release();

    Ok(())
}
