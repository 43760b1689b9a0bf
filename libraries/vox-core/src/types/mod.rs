mod filter;
mod job;

pub use filter::{
    FilterArg, FilterGraph, NamedFilter, BANDPASS_HIGHPASS_HZ, BANDPASS_LOWPASS_HZ,
};
pub use job::{display_name, NoiseFilterMode, OutputExtension, ProcessingJob};
