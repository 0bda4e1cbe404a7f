use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::ROTATIONS;

/// Orientation of a tile, clockwise from its original position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// One click: +90 degrees, wrapping 270 back to 0.
    pub fn next(self) -> Rotation {
        let idx = ROTATIONS.iter().position(|r| *r == self).unwrap_or(0);
        ROTATIONS[(idx + 1) % ROTATIONS.len()]
    }

    /// Uniform draw over the four orientations, zero included.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Rotation {
        ROTATIONS[rng.random_range(0..ROTATIONS.len())]
    }

    pub fn is_upright(self) -> bool {
        self == Rotation::Deg0
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        match deg {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("unsupported rotation {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn next_cycles_through_all_four() {
        let mut r = Rotation::Deg0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(r.degrees());
            r = r.next();
        }
        assert_eq!(seen, vec![0, 90, 180, 270]);
        assert_eq!(r, Rotation::Deg0);
        assert_eq!(Rotation::Deg270.next(), Rotation::Deg0);
    }

    #[test]
    fn random_draws_cover_the_cycle() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut counts = [0usize; 4];
        for _ in 0..400 {
            let r = Rotation::random(&mut rng);
            counts[(r.degrees() / 90) as usize] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0), "counts: {counts:?}");
    }

    #[test]
    fn degrees_round_trip_through_serde() {
        let json = serde_json::to_string(&[Rotation::Deg90, Rotation::Deg270]).unwrap();
        assert_eq!(json, "[90,270]");
        let back: Vec<Rotation> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Rotation::Deg90, Rotation::Deg270]);
        assert!(serde_json::from_str::<Rotation>("45").is_err());
    }
}
