use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Uniform draws from the Latin alphabet. Draws are independent, so the same
/// letter can come up in consecutive rounds.
pub struct LetterGenerator {
    rng: SmallRng,
}

impl LetterGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_letter(&mut self) -> char {
        ALPHABET[self.rng.gen_range(0..ALPHABET.len())]
    }
}

impl Default for LetterGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_letters_are_uppercase_latin() {
        let mut letters = LetterGenerator::seeded(7);
        for _ in 0..200 {
            let ch = letters.next_letter();
            assert!(ch.is_ascii_uppercase(), "unexpected letter {ch}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = LetterGenerator::seeded(42);
        let mut b = LetterGenerator::seeded(42);
        let seq_a: Vec<char> = (0..20).map(|_| a.next_letter()).collect();
        let seq_b: Vec<char> = (0..20).map(|_| b.next_letter()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_every_letter_eventually_drawn() {
        let mut letters = LetterGenerator::seeded(3);
        let seen: HashSet<char> = (0..5000).map(|_| letters.next_letter()).collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }
}
