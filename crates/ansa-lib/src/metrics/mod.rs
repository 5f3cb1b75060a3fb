pub mod eda;
pub mod hrv;
pub mod ptt;

pub use eda::{scl_level, scr_frequency};
pub use hrv::{heart_rate, lf_hf_ratio, rmssd, sdnn};
pub use ptt::ptt_from_pairs;
