use serde::{Deserialize, Serialize};

/// Basic typed time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Uniform sampling frequency in Hz
    pub fs: f64,
    /// Samples
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs
    }
}

/// Point events on a timeline (e.g., cardiac R-peak indices).
/// Indices are strictly ascending by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Events {
    pub indices: Vec<usize>,
}

impl Events {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }
    pub fn len(&self) -> usize {
        self.indices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Inter-beat intervals in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IbiSeries {
    pub ibi: Vec<f64>,
}

impl IbiSeries {
    /// Successive time differences between consecutive event indices.
    /// Returns `None` when fewer than two events exist.
    pub fn from_events(events: &Events, fs: f64) -> Option<Self> {
        if events.indices.len() < 2 {
            return None;
        }
        let mut ibi = Vec::with_capacity(events.indices.len() - 1);
        for w in events.indices.windows(2) {
            ibi.push((w[1] as f64 - w[0] as f64) / fs);
        }
        Some(Self { ibi })
    }

    pub fn len(&self) -> usize {
        self.ibi.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ibi.is_empty()
    }
}
