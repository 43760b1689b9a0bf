//! Typed audio filter graphs
//!
//! Stage logic builds a [`FilterGraph`] value; only the tool runner turns it into
//! ffmpeg's textual `-filter:a` argument through `Display`.

use std::fmt;

/// High-pass corner frequency used by the bandpass gate
pub const BANDPASS_HIGHPASS_HZ: u32 = 200;

/// Low-pass corner frequency used by the bandpass gate
pub const BANDPASS_LOWPASS_HZ: u32 = 3000;

/// One argument of a named filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    /// Option name, `None` for positional arguments
    pub key: Option<String>,
    pub value: String,
}

/// A single ffmpeg filter with its arguments, e.g. `highpass=200`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFilter {
    pub name: String,
    pub args: Vec<FilterArg>,
}

impl NamedFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.args.push(FilterArg {
            key: None,
            value: value.into(),
        });
        self
    }

    /// Append a `key=value` option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push(FilterArg {
            key: Some(key.into()),
            value: value.into(),
        });
        self
    }
}

impl fmt::Display for NamedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            if let Some(key) = &arg.key {
                write!(f, "{}=", key)?;
            }
            f.write_str(&escape_value(&arg.value))?;
        }
        Ok(())
    }
}

/// Audio filter graph applied by one pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum FilterGraph {
    /// No filtering; the tool only re-encodes
    Passthrough,

    /// Uniform gain in decibels
    Gain { db: f64 },

    /// Any other single filter
    Named(NamedFilter),

    /// Filters applied one after another, in order
    Cascade(Vec<FilterGraph>),
}

impl FilterGraph {
    pub fn gain(db: f64) -> Self {
        Self::Gain { db }
    }

    pub fn cascade(filters: impl IntoIterator<Item = FilterGraph>) -> Self {
        Self::Cascade(filters.into_iter().collect())
    }

    pub fn highpass(hz: u32) -> Self {
        Self::Named(NamedFilter::new("highpass").with_value(hz.to_string()))
    }

    pub fn lowpass(hz: u32) -> Self {
        Self::Named(NamedFilter::new("lowpass").with_value(hz.to_string()))
    }

    /// FFT-based adaptive denoiser
    pub fn fft_denoise() -> Self {
        Self::Named(NamedFilter::new("afftdn"))
    }

    /// Recurrent-network noise suppression using the model file at `model`
    pub fn rnnoise(model: &str) -> Self {
        Self::Named(NamedFilter::new("arnndn").with_option("m", model))
    }

    /// Pad with silence until the whole stream lasts at least `seconds`
    pub fn pad_whole_duration(seconds: f64) -> Self {
        Self::Named(NamedFilter::new("apad").with_option("whole_dur", seconds.to_string()))
    }

    /// Whether this graph leaves the signal untouched
    pub fn is_passthrough(&self) -> bool {
        match self {
            Self::Passthrough => true,
            Self::Cascade(filters) => filters.iter().all(FilterGraph::is_passthrough),
            Self::Gain { .. } | Self::Named(_) => false,
        }
    }

    /// The `-filter:a` argument for this graph, `None` when there is nothing to apply
    pub fn to_filter_arg(&self) -> Option<String> {
        if self.is_passthrough() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => Ok(()),
            Self::Gain { db } => write!(f, "volume={}dB", db),
            Self::Named(filter) => fmt::Display::fmt(filter, f),
            Self::Cascade(filters) => {
                let mut first = true;
                for filter in filters.iter().filter(|g| !g.is_passthrough()) {
                    if !first {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(filter, f)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// Escape an option value for both levels of ffmpeg filter-graph parsing
///
/// Level one is the filter option parser (`\ ' :`), level two is the graph
/// parser (`\ ' [ ] , ;`).
fn escape_value(value: &str) -> String {
    let mut option_level = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'' | ':') {
            option_level.push('\\');
        }
        option_level.push(c);
    }

    let mut graph_level = String::with_capacity(option_level.len());
    for c in option_level.chars() {
        if matches!(c, '\\' | '\'' | '[' | ']' | ',' | ';') {
            graph_level.push('\\');
        }
        graph_level.push(c);
    }
    graph_level
}
