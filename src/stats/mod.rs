//! Statistics module - Summaries behind box plots, histograms and correlation

mod calculator;

pub use calculator::{BoxStats, CorrelationMatrix, Histogram, StatsCalculator, WHISKER_IQR_FACTOR};
