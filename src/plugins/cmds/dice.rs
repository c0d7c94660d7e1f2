//! `dice [roll]` - roll dice in `NdM` notation
//!
//! ```text
//! dice
//! // => 3
//! dice 3d6
//! // => 4 2 5
//! ```

use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::Regex;

use crate::application::messaging::guards;
use crate::domain::entities::{ArgValue, Positional};
use crate::plugins::{CommandHandler, CommandSpec};

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;

static NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d*)[dD](\d+)$").expect("dice notation pattern is valid"));

pub fn dice() -> CommandSpec {
    CommandSpec::new(
        "dice",
        "Simulate a dice roll",
        CommandHandler::sync(|ctx| Ok(ctx.args.str("roll").map(str::to_string))),
    )
    .with_positional(
        Positional::optional("roll")
            .with_description("Dice to roll, e.g. 3d6")
            .with_default("1d6")
            .with_coercion(|raw| {
                let rolls = roll(raw, &mut rand::rng())?;
                let rolls: Vec<String> = rolls.iter().map(u32::to_string).collect();
                Ok(ArgValue::Str(rolls.join(" ")))
            }),
    )
    .with_guard(guards::not_blacklisted)
}

/// Roll `NdM`: N dice (default 1) with M sides each
pub fn roll<R: Rng>(notation: &str, rng: &mut R) -> Result<Vec<u32>, String> {
    let caps = NOTATION
        .captures(notation)
        .ok_or_else(|| format!("expected NdM (like 3d6), got '{}'", notation))?;

    let count = match &caps[1] {
        "" => 1,
        digits => digits.parse::<u32>().map_err(|_| "too many dice".to_string())?,
    };
    let sides = caps[2].parse::<u32>().map_err(|_| "too many sides".to_string())?;

    if !(1..=MAX_DICE).contains(&count) {
        return Err(format!("number of dice must be between 1 and {}", MAX_DICE));
    }
    if !(2..=MAX_SIDES).contains(&sides) {
        return Err(format!("number of sides must be between 2 and {}", MAX_SIDES));
    }

    Ok((0..count).map(|_| rng.random_range(1..=sides)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let rolls = roll("3d6", &mut rng).unwrap();
        assert_eq!(rolls.len(), 3);
        assert!(rolls.iter().all(|r| (1..=6).contains(r)));
    }

    #[test]
    fn test_count_defaults_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(roll("d20", &mut rng).unwrap().len(), 1);
        assert_eq!(roll("2D4", &mut rng).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_bad_notation() {
        let mut rng = StdRng::seed_from_u64(7);
        for bad in ["", "3", "3d", "xdy", "0d6", "101d6", "2d1", "1d1001", "99999999999d6"] {
            assert!(roll(bad, &mut rng).is_err(), "{:?}", bad);
        }
    }
}
