//! Dense linear layer used as a reference checkpointable model.

use super::HasParameters;
use crate::checkpoint::Checkpointable;
use crate::{ClimausError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Fully connected layer computing `y = W x + b`.
///
/// `weights` is row-major with shape `[out_features, in_features]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub in_features: usize,
    pub out_features: usize,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
}

impl Linear {
    /// Create a layer with all parameters set to zero.
    pub fn zeros(in_features: usize, out_features: usize) -> Self {
        Self {
            in_features,
            out_features,
            weights: vec![0.0; in_features * out_features],
            bias: vec![0.0; out_features],
        }
    }

    /// Create a layer with uniform init in `[-1/sqrt(in), 1/sqrt(in)]`.
    pub fn seeded(in_features: usize, out_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let mut sample = || rng.gen_range(-bound..=bound);

        let weights = (0..in_features * out_features).map(|_| sample()).collect();
        let bias = (0..out_features).map(|_| sample()).collect();

        Self {
            in_features,
            out_features,
            weights,
            bias,
        }
    }

    /// Apply the layer to one input vector.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.in_features {
            return Err(ClimausError::State(format!(
                "Linear expects {} inputs, got {}",
                self.in_features,
                input.len()
            )));
        }

        let output = self
            .weights
            .chunks(self.in_features.max(1))
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();
        Ok(output)
    }
}

impl HasParameters for Linear {
    fn num_parameters(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}

impl Checkpointable for Linear {
    fn save_state(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn load_state(&mut self, data: &[u8]) -> Result<()> {
        let loaded: Linear = serde_json::from_slice(data)?;

        if loaded.in_features != self.in_features || loaded.out_features != self.out_features {
            return Err(ClimausError::State(format!(
                "shape mismatch: expected {}x{}, checkpoint has {}x{}",
                self.out_features, self.in_features, loaded.out_features, loaded.in_features
            )));
        }
        if loaded.weights.len() != self.weights.len() || loaded.bias.len() != self.bias.len() {
            return Err(ClimausError::State(
                "checkpoint parameter count does not match its declared shape".into(),
            ));
        }

        *self = loaded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let a = Linear::seeded(3, 2, 7);
        let b = Linear::seeded(3, 2, 7);
        let c = Linear::seeded(3, 2, 8);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.num_parameters(), 8);
        assert_eq!(a.model_kind(), "Linear");
    }

    #[test]
    fn test_forward() {
        let layer = Linear {
            in_features: 2,
            out_features: 2,
            weights: vec![1.0, 2.0, 3.0, 4.0],
            bias: vec![0.5, -1.0],
        };

        assert_eq!(layer.forward(&[1.0, 1.0]).unwrap(), vec![3.5, 6.0]);
        assert!(layer.forward(&[1.0]).is_err());
    }

    #[test]
    fn test_state_restores_parameters() {
        let source = Linear::seeded(4, 3, 1);
        let mut target = Linear::zeros(4, 3);

        target.load_state(&source.save_state().unwrap()).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn test_state_rejects_shape_mismatch() {
        let source = Linear::seeded(4, 3, 1);
        let mut target = Linear::zeros(2, 3);

        let err = target.load_state(&source.save_state().unwrap()).unwrap_err();
        assert!(matches!(err, ClimausError::State(_)));
        assert_eq!(target, Linear::zeros(2, 3));
    }

    #[test]
    fn test_state_rejects_garbage() {
        let mut target = Linear::zeros(1, 1);
        assert!(matches!(
            target.load_state(b"not json"),
            Err(ClimausError::Json(_))
        ));
    }
}
