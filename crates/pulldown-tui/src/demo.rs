//! Demo refresh handler and page content

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use pulldown_core::RefreshHandler;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::RefreshResult;

/// Pretends to fetch new items, taking a fixed amount of time
pub struct DemoRefresher {
    delay: Duration,
    results: mpsc::UnboundedSender<RefreshResult>,
    rounds: AtomicU32,
}

impl DemoRefresher {
    pub fn new(delay: Duration, results: mpsc::UnboundedSender<RefreshResult>) -> Self {
        Self {
            delay,
            results,
            rounds: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl RefreshHandler for DemoRefresher {
    async fn refresh(&self) {
        let round = self.rounds.fetch_add(1, Ordering::Relaxed);
        debug!(round, delay_ms = self.delay.as_millis() as u64, "Demo refresh running");
        tokio::time::sleep(self.delay).await;

        let result = RefreshResult {
            fetched_at: Local::now(),
            new_items: round % 3 + 1,
        };
        if self.results.send(result).is_err() {
            warn!("Failed to deliver demo refresh result: receiver dropped");
        }
    }
}

/// Rows of the banner artwork, centered by the banner widget
pub const BANNER_ART: [&str; 3] = ["    .    *    .", "  *   \\ | /   *", "  . -- ( ) -- ."];

/// Spinner frames for the loading indicator
pub const SPINNER: [&str; 4] = ["( o   )", "(  o  )", "(   o )", "(  o  )"];

const LOREM: &str = "Lorem ipsum, dolor sit amet consectetur adipisicing elit. Aut doloremque \
veritatis porro quae delectus nobis rem id facilis ex. Repudiandae consequatur voluptates \
itaque distinctio exercitationem aliquam iusto qui, eum consectetur! Dolores modi numquam \
totam, possimus voluptatum laudantium officia itaque ipsam similique ut! Ratione expedita \
ipsa, nesciunt quae omnis quibusdam blanditiis itaque delectus aspernatur commodi ducimus \
tempora velit animi harum exercitationem. Pariatur cupiditate sint rerum sit, quis repellat \
vitae eos optio qui quidem! Eligendi autem cupiditate corporis aliquam, dignissimos debitis \
qui. Quas quaerat reiciendis minima tempora sed cumque voluptas. At, labore.";

/// Initial page content: a long filler text split into paragraphs
pub fn initial_content() -> Vec<String> {
    let mut lines = vec![
        "Drag the page down with the left mouse button to refresh.".to_string(),
        String::new(),
    ];
    for paragraph in 1..=12 {
        lines.push(format!("{}. {}", paragraph, LOREM));
        lines.push(String::new());
    }
    lines
}
