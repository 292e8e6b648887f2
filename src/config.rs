//! Run configuration derived from the page URL and the `GFXPERFTEST_CONFIG`
//! global injected by the test server.

use crate::domain::benchmark::{
    BenchmarkSettings, StutterThresholds, DEFAULT_RANDOM_SEED, DEFAULT_UNIT_MS,
};
use crate::domain::logging::LogComponent;
use crate::log_warn;
use std::fmt::Display;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter};

pub const DEFAULT_NUM_FRAMES: u32 = 100;
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;
pub const COLLECTOR_PORT: u16 = 8888;

/// Recognized query-string options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum QueryKey {
    #[strum(serialize = "numframes")]
    NumFrames,
    Width,
    Height,
    KeepWindowSize,
    FakeWebgl,
    OrderTest,
    TotalTest,
    OrderGlobal,
    TotalGlobal,
    /// Seed for the page's `Math.random`.
    #[strum(serialize = "seed")]
    RandomSeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

/// `order` of `total`, e.g. test 3 of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub order: u32,
    pub total: u32,
}

impl Progress {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.order as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn label(&self) -> String {
        format!("{}/{} {}%", self.order, self.total, self.percent())
    }
}

/// Position of this run in the current test batch; display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub test: Progress,
    pub global: Progress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub num_frames: u32,
    /// `None` when the page keeps its own window size.
    pub viewport: Option<Viewport>,
    pub fake_webgl: bool,
    pub progress: Option<RunProgress>,
    pub thresholds: StutterThresholds,
    pub clock_seed: u64,
    pub random_seed: u64,
    pub time_unit_ms: f64,
    /// Replace `performance.now()`/`Date.now()` with deterministic time.
    pub override_time: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            num_frames: DEFAULT_NUM_FRAMES,
            viewport: Some(Viewport::default()),
            fake_webgl: false,
            progress: None,
            thresholds: StutterThresholds::default(),
            clock_seed: 0,
            random_seed: DEFAULT_RANDOM_SEED,
            time_unit_ms: DEFAULT_UNIT_MS,
            override_time: true,
        }
    }
}

impl HarnessConfig {
    /// Build from a query-string lookup. Flags count as set when present,
    /// whatever their value; bad numbers fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: QueryKey| lookup(key.as_ref());
        let has = |key: QueryKey| get(key).is_some();

        let num_frames = parse_or(get(QueryKey::NumFrames), QueryKey::NumFrames, DEFAULT_NUM_FRAMES)
            .max(1);

        let viewport = if has(QueryKey::KeepWindowSize) {
            None
        } else {
            Some(Viewport {
                width: parse_or(get(QueryKey::Width), QueryKey::Width, DEFAULT_WIDTH),
                height: parse_or(get(QueryKey::Height), QueryKey::Height, DEFAULT_HEIGHT),
            })
        };

        let progress = has(QueryKey::OrderGlobal).then(|| RunProgress {
            test: Progress {
                order: parse_or(get(QueryKey::OrderTest), QueryKey::OrderTest, 0),
                total: parse_or(get(QueryKey::TotalTest), QueryKey::TotalTest, 0),
            },
            global: Progress {
                order: parse_or(get(QueryKey::OrderGlobal), QueryKey::OrderGlobal, 0),
                total: parse_or(get(QueryKey::TotalGlobal), QueryKey::TotalGlobal, 0),
            },
        });

        Self {
            num_frames,
            viewport,
            fake_webgl: has(QueryKey::FakeWebgl),
            progress,
            random_seed: parse_or(get(QueryKey::RandomSeed), QueryKey::RandomSeed, DEFAULT_RANDOM_SEED),
            ..Self::default()
        }
    }

    pub fn benchmark_settings(&self, test_id: &str) -> BenchmarkSettings {
        BenchmarkSettings {
            test_id: test_id.to_string(),
            num_frames: self.num_frames,
            thresholds: self.thresholds,
            clock_seed: self.clock_seed,
            time_unit_ms: self.time_unit_ms,
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: QueryKey, default: T) -> T
where
    T: FromStr + Display + Default + PartialEq,
{
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) if key != QueryKey::NumFrames || parsed != T::default() => parsed,
            _ => {
                log_warn!(
                    LogComponent::Infrastructure("Config"),
                    "Ignoring {}={:?}, using {}",
                    key.as_ref(),
                    value,
                    default
                );
                default
            }
        },
    }
}

/// Connection details for the collector service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub server_ip: String,
    pub test_id: String,
    /// Forward every console call as a `log` event.
    pub send_log: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { server_ip: "localhost".to_string(), test_id: String::new(), send_log: false }
    }
}

impl CollectorConfig {
    pub fn new(server_ip: Option<String>, test_id: Option<String>, send_log: bool) -> Self {
        let defaults = Self::default();
        Self {
            server_ip: server_ip.filter(|ip| !ip.is_empty()).unwrap_or(defaults.server_ip),
            test_id: test_id.unwrap_or(defaults.test_id),
            send_log,
        }
    }

    pub fn collector_url(&self) -> String {
        format!("ws://{}:{}", self.server_ip, COLLECTOR_PORT)
    }
}
