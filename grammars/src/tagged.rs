//! Tagged tokens.
//!
//! A token is a tag made of letters, a colon and then a value whose
//! syntax depends on the tag:
//!
//! | tag        | value            | example          |
//! |------------|------------------|------------------|
//! | `string`   | letters          | `string:hello`   |
//! | `number`   | decimal digits   | `number:42`      |
//! | `diceroll` | `<count>d<sides>`| `diceroll:2d6`   |
use serde::Serialize;

use base::prelude::*;

use super::number;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    String(String),
    Number(u64),
    /// Number of dice, then number of sides.
    DiceRoll(u32, u32),
}

fn dice_roll() -> Parser<str, Token> {
    number::<u32>()
        .then(literal("d"))
        .then(number::<u32>())
        .map(|((count, _), sides)| Token::DiceRoll(count, sides))
}

/// Parses a single tagged token.  An unrecognised tag is an error
/// reported at the index just after the colon.
#[must_use]
pub fn tagged_token() -> Parser<str, Token> {
    letters()
        .then(literal(":"))
        .map(|(tag, _)| tag)
        .chain(|tag| match tag.as_str() {
            "string" => letters().map(Token::String),
            "number" => number::<u64>().map(Token::Number),
            "diceroll" => dice_roll(),
            other => fail(&format!("tagged_token: unknown tag {other:?}")),
        })
}

/// Parses tokens separated by single spaces.
#[must_use]
pub fn tagged_tokens() -> Parser<str, Vec<Token>> {
    sep_by_one(literal(" "))(tagged_token())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_tag() {
        let p = tagged_token();
        assert_eq!(
            p.run("string:hello").result(),
            Some(&Token::String("hello".to_string()))
        );
        assert_eq!(p.run("number:42").result(), Some(&Token::Number(42)));
        let state = p.run("diceroll:2d6");
        assert_eq!(state.result(), Some(&Token::DiceRoll(2, 6)));
        assert_eq!(state.index(), 12);
    }

    #[test]
    fn test_value_must_match_tag() {
        let state = tagged_token().run("number:abc");
        assert_eq!(
            state.error().map(ParseError::kind),
            Some(ParseErrorKind::ClassMismatch)
        );
        assert_eq!(state.index(), 7);
    }

    #[test]
    fn test_unknown_tag() {
        let state = tagged_token().run("colour:red");
        let e = state.error().expect("colour is not a tag");
        assert_eq!(e.kind(), ParseErrorKind::Custom);
        assert_eq!(e.message(), "tagged_token: unknown tag \"colour\"");
        assert_eq!(state.index(), 7);
    }

    #[test]
    fn test_dice_roll_needs_sides() {
        assert!(tagged_token().run("diceroll:2d").is_error());
    }

    #[test]
    fn test_several_tokens() {
        let state = tagged_tokens().run("string:hi number:7 diceroll:1d20");
        assert_eq!(
            state.result(),
            Some(&vec![
                Token::String("hi".to_string()),
                Token::Number(7),
                Token::DiceRoll(1, 20),
            ])
        );
    }
}
