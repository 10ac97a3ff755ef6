use rand::{Rng, rngs::OsRng, seq::SliceRandom};

use super::{MAX_LENGTH, MIN_LENGTH, PasswordPolicy, charset::build_charset};
use crate::error::InputError;

/// Upper bound on resampling when every class has to be present.
pub const MAX_ATTEMPTS: usize = 100;

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Every policy rule holds.
    Satisfied(String),
    /// `require_all_classes` could not be met within [`MAX_ATTEMPTS`]; the
    /// password is an unconstrained sample from the same charset.
    Fallback { password: String, warning: String },
}

impl Generated {
    pub fn password(&self) -> &str {
        match self {
            Generated::Satisfied(password) => password,
            Generated::Fallback { password, .. } => password,
        }
    }

    pub fn into_password(self) -> String {
        match self {
            Generated::Satisfied(password) => password,
            Generated::Fallback { password, .. } => password,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Generated::Satisfied(_) => None,
            Generated::Fallback { warning, .. } => Some(warning),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::Fallback { .. })
    }
}

pub fn generate<R: Rng + ?Sized>(
    policy: &PasswordPolicy,
    rng: &mut R,
) -> Result<Generated, InputError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&policy.length) {
        return Err(InputError::LengthOutOfRange {
            length: policy.length,
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        });
    }

    let charset = build_charset(policy)?;

    if !policy.require_all_classes {
        return Ok(Generated::Satisfied(sample(
            charset.chars(),
            policy.length,
            rng,
        )));
    }

    for attempt in 1..=MAX_ATTEMPTS {
        let password = sample(charset.chars(), policy.length, rng);
        if charset.covers_all_classes(&password) {
            tracing::debug!(attempt, length = policy.length, "generated password");
            return Ok(Generated::Satisfied(password));
        }
    }

    let warning = format!(
        "Could not generate a password containing every character type in {MAX_ATTEMPTS} attempts. \
         Try increasing the length or relaxing some rules."
    );
    tracing::debug!(
        length = policy.length,
        classes = ?charset.classes(),
        "falling back to an unconstrained sample"
    );

    Ok(Generated::Fallback {
        password: sample(charset.chars(), policy.length, rng),
        warning,
    })
}

/// [`generate`] backed by the operating system's RNG.
pub fn generate_secure(policy: &PasswordPolicy) -> Result<Generated, InputError> {
    generate(policy, &mut OsRng)
}

fn sample<R: Rng + ?Sized>(chars: &[char], length: usize, rng: &mut R) -> String {
    (0..length)
        .filter_map(|_| chars.choose(rng).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{AMBIGUOUS_CHARS, CharClass, SIMILAR_CHARS};
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng, rngs::mock::StepRng};
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[test]
    fn lowercase_and_digits_example() {
        let policy = PasswordPolicy {
            exclude_similar: false,
            ..PasswordPolicy::with_classes(12, &[CharClass::Lower, CharClass::Digit])
        };
        let mut rng = StdRng::seed_from_u64(7);

        let password = generate(&policy, &mut rng).unwrap().into_password();

        assert_eq!(password.len(), 12);
        assert!(
            password
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn length_out_of_range_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);

        for length in [0, 7, 33] {
            let policy = PasswordPolicy {
                length,
                ..PasswordPolicy::default()
            };
            let err = generate(&policy, &mut rng).unwrap_err();
            assert!(matches!(err, InputError::LengthOutOfRange { .. }));
        }
    }

    #[test]
    fn empty_charset_is_rejected() {
        let policy = PasswordPolicy {
            exclude: "0123456789".into(),
            ..PasswordPolicy::with_classes(10, &[CharClass::Digit])
        };

        let err = generate(&policy, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, InputError::EmptyCharset);
    }

    #[test]
    fn falls_back_when_classes_cannot_be_covered() {
        // A constant RNG always picks the first character, so only one class ever appears.
        let mut rng = StepRng::new(0, 0);
        let policy = PasswordPolicy::default();

        let generated = generate(&policy, &mut rng).unwrap();

        assert!(generated.is_fallback());
        assert_eq!(generated.password(), "A".repeat(16));
        assert!(generated.warning().unwrap().contains("100 attempts"));
    }

    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn fallback_warning_is_left_to_the_caller() {
        let logged = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&logged);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || Captured(Arc::clone(&sink)))
            .finish();

        let generated = tracing::subscriber::with_default(subscriber, || {
            generate(&PasswordPolicy::default(), &mut StepRng::new(0, 0)).unwrap()
        });

        assert!(generated.is_fallback());
        assert!(logged.lock().unwrap().is_empty());
    }

    #[test]
    fn single_class_never_falls_back() {
        let mut rng = StepRng::new(0, 0);
        let policy = PasswordPolicy::with_classes(8, &[CharClass::Digit]);

        let generated = generate(&policy, &mut rng).unwrap();

        assert_eq!(generated, Generated::Satisfied("2".repeat(8)));
    }

    #[test]
    fn generate_secure_uses_policy() {
        let policy = PasswordPolicy::with_classes(32, &[CharClass::Upper]);

        let generated = generate_secure(&policy).unwrap();

        assert_eq!(generated.password().len(), 32);
        assert!(generated.password().chars().all(|c| c.is_ascii_uppercase()));
    }

    fn any_policy() -> impl Strategy<Value = PasswordPolicy> {
        (
            MIN_LENGTH..=MAX_LENGTH,
            prop::array::uniform4(any::<bool>()),
            "[a-zA-Z0-9!@#]{0,6}",
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_filter("at least one class", |(_, classes, ..)| {
                classes.iter().any(|enabled| *enabled)
            })
            .prop_map(
                |(length, [upper, lower, digit, symbol], exclude, similar, ambiguous, require)| {
                    PasswordPolicy {
                        length,
                        uppercase: upper,
                        lowercase: lower,
                        digits: digit,
                        symbols: symbol,
                        exclude,
                        exclude_similar: similar,
                        exclude_ambiguous: ambiguous,
                        require_all_classes: require,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn generated_password_respects_policy(policy in any_policy(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let charset = build_charset(&policy).unwrap();
            let generated = generate(&policy, &mut rng).unwrap();
            let password = generated.password();

            prop_assert_eq!(password.chars().count(), policy.length);
            prop_assert!(password.chars().all(|c| charset.contains(c)));
            prop_assert!(password.chars().all(|c| !policy.exclude.contains(c)));
            if policy.exclude_similar {
                prop_assert!(password.chars().all(|c| !SIMILAR_CHARS.contains(c)));
            }
            if policy.exclude_ambiguous {
                prop_assert!(password.chars().all(|c| !AMBIGUOUS_CHARS.contains(c)));
            }
            if policy.require_all_classes && !generated.is_fallback() {
                prop_assert!(charset.covers_all_classes(password));
            }
        }
    }
}
