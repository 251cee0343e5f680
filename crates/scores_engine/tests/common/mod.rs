#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use scores_engine::{Pause, PauseKind};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scores_logging::initialize_for_tests);
}

/// Records every requested pause instead of sleeping.
#[derive(Default, Clone)]
pub struct RecordingPause {
    pauses: Arc<Mutex<Vec<(PauseKind, Duration)>>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<PauseKind> {
        self.pauses.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }

    pub fn count(&self, kind: PauseKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn durations(&self, kind: PauseKind) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, d)| *d)
            .collect()
    }
}

#[async_trait::async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, kind: PauseKind, duration: Duration) {
        self.pauses.lock().unwrap().push((kind, duration));
    }
}

/// A current-format game block. `away` is listed first, as on the site.
pub fn current_block(link_date: &str, away: (&str, &str), home: (&str, &str), extra: &str) -> String {
    format!(
        r#"<div class="game_summary nohover gender-m">
  <table class="teams"><tbody>
    <tr class="loser">
      <td><a href="/cbb/schools/{away_slug}/men/2022.html">{away_name}</a></td>
      <td class="right">{away_score}</td>
      <td class="right gamelink"><a href="/cbb/boxscores/{link_date}-19-{home_slug}.html">Final{extra}</a></td>
    </tr>
    <tr class="winner">
      <td><a href="/cbb/schools/{home_slug}/men/2022.html">{home_name}</a></td>
      <td class="right">{home_score}</td>
      <td class="right">&nbsp;</td>
    </tr>
  </tbody></table>
</div>"#,
        away_slug = slug(away.0),
        away_name = away.0,
        away_score = away.1,
        home_slug = slug(home.0),
        home_name = home.0,
        home_score = home.1,
    )
}

pub fn womens_block(link_date: &str) -> String {
    format!(
        r#"<div class="game_summary nohover gender-f">
  <table class="teams"><tbody>
    <tr><td colspan="3">Women's</td></tr>
    <tr>
      <td><a href="/cbb/schools/team-e/women/2022.html">Team E</a></td>
      <td class="right">60</td>
      <td class="right gamelink"><a href="/cbb/boxscores/{link_date}-17-team-f.html">Final</a></td>
    </tr>
    <tr>
      <td><a href="/cbb/schools/team-f/women/2022.html">Team F</a></td>
      <td class="right">58</td>
      <td class="right">&nbsp;</td>
    </tr>
  </tbody></table>
</div>"#
    )
}

pub fn page(blocks: &[String]) -> String {
    format!(
        "<html><head><title>Men's College Basketball Scores</title></head><body><div class=\"game_summaries\">{}</div></body></html>",
        blocks.join("\n")
    )
}

fn slug(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}
