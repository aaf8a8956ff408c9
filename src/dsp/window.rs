//! Analysis and synthesis window functions
//!
//! Windows are generated in periodic form so that half-overlapped analysis
//! and synthesis passes sum to a smooth envelope over the signal interior.

use std::fmt;
use std::str::FromStr;

use crate::error::AnchorError;

/// Supported window shapes for the short-time transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl WindowKind {
    /// Generate the periodic window coefficients for a transform of `num_points`
    pub fn coefficients(self, num_points: usize) -> Vec<f32> {
        let n = num_points as f32;
        (0..num_points)
            .map(|k| {
                let phase = 2.0 * std::f32::consts::PI * k as f32 / n;
                match self {
                    WindowKind::Hann => 0.5 * (1.0 - phase.cos()),
                    WindowKind::Hamming => 0.54 - 0.46 * phase.cos(),
                    WindowKind::Blackman => {
                        0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
                    }
                    WindowKind::Rectangular => 1.0,
                }
            })
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::Rectangular => "rectangular",
        }
    }
}

impl Default for WindowKind {
    fn default() -> Self {
        WindowKind::Hann
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hann" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "rectangular" | "rect" => Ok(WindowKind::Rectangular),
            _ => Err(AnchorError::UnknownWindow {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let window = WindowKind::Hann.coefficients(8);
        assert_eq!(window.len(), 8);
        assert!(window[0].abs() < 1e-7);
        assert!((window[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_periodic_symmetry() {
        for kind in [WindowKind::Hann, WindowKind::Hamming, WindowKind::Blackman] {
            let window = kind.coefficients(64);
            for k in 1..64 {
                assert!(
                    (window[k] - window[64 - k]).abs() < 1e-6,
                    "{} window asymmetric at index {}",
                    kind,
                    k
                );
            }
        }
    }

    #[test]
    fn test_hann_half_overlap_sums_to_one() {
        let window = WindowKind::Hann.coefficients(64);
        for k in 0..32 {
            assert!((window[k] + window[k + 32] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rectangular_is_flat() {
        let window = WindowKind::Rectangular.coefficients(16);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_hamming_floor() {
        let window = WindowKind::Hamming.coefficients(128);
        assert!(window.iter().all(|&w| w >= 0.079));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hann".parse::<WindowKind>().unwrap(), WindowKind::Hann);
        assert_eq!("Blackman".parse::<WindowKind>().unwrap(), WindowKind::Blackman);
        assert_eq!("rect".parse::<WindowKind>().unwrap(), WindowKind::Rectangular);
        assert!("kaiser".parse::<WindowKind>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for kind in [
            WindowKind::Hann,
            WindowKind::Hamming,
            WindowKind::Blackman,
            WindowKind::Rectangular,
        ] {
            let parsed: WindowKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
