use rand::seq::SliceRandom;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use super::basic::{Card, Rank, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("Malformed card token: {0}")]
    MalformedToken(String),
    #[error("Unknown rank token: {0}")]
    UnknownRank(String),
    #[error("Unknown suit token: {0}")]
    UnknownSuit(String),
}

/// An ordered 52-card deck. Built once per round; cards leave through
/// `draw` and never come back.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build the full deck, suit by suit with ranks ascending, and shuffle
    /// it uniformly. Pass `shuffle = false` only for deterministic tests.
    pub fn new(shuffle: bool) -> Self {
        let mut cards = Vec::with_capacity(52);
        let mut id = 0u32;
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card::new(id, rank, suit));
                id += 1;
            }
        }

        if shuffle {
            cards.shuffle(&mut rand::rng());
        }

        debug!(cards = cards.len(), shuffled = shuffle, "deck built");
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| c.id == card.id)
    }

    /// Remove and return `amount` cards from the front of the deck.
    ///
    /// The draw is refused (empty result, deck untouched) unless
    /// `amount >= 1 && amount < remaining - amount`: a draw must leave more
    /// cards behind than it takes. Callers check for an empty result.
    pub fn draw(&mut self, amount: usize) -> Vec<Card> {
        if amount >= 1 && amount < self.cards.len().saturating_sub(amount) {
            let drawn: Vec<Card> = self.cards.drain(0..amount).collect();
            debug!(drawn = drawn.len(), remaining = self.cards.len(), "drew cards");
            drawn
        } else {
            Vec::new()
        }
    }

    /// Sort cards rank-descending. Stable: cards of equal rank keep their
    /// original relative order. Classification relies on this ordering.
    pub fn sort_desc(cards: &[Card]) -> Vec<Card> {
        let mut sorted = cards.to_vec();
        sorted.sort_by(|a, b| b.rank.cmp(&a.rank));
        sorted
    }

    /// Stringify cards as `<id>#<rank><suit>` tokens, e.g. "23#AS", "7#10D".
    pub fn serialize(cards: &[Card]) -> Vec<String> {
        cards
            .iter()
            .map(|card| format!("{}#{}", card.id, card.face()))
            .collect()
    }

    /// Parse tokens produced by `serialize`. Round-trips id, rank and suit
    /// exactly; color and symbol are derived from the suit.
    pub fn deserialize<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Card>, DeckError> {
        tokens
            .iter()
            .map(|token| Self::parse_token(token.as_ref()))
            .collect()
    }

    fn parse_token(token: &str) -> Result<Card, DeckError> {
        let (id, face) = token
            .split_once('#')
            .ok_or_else(|| DeckError::MalformedToken(token.to_string()))?;
        let id: u32 = id
            .parse()
            .map_err(|_| DeckError::MalformedToken(token.to_string()))?;
        if face.len() < 2 {
            return Err(DeckError::MalformedToken(token.to_string()));
        }

        // The rank token is everything up to the single suit letter ("10H"
        // splits as "10" + "H")
        let (rank_token, suit_token) = face.split_at(face.len() - 1);
        let rank = Rank::try_from(rank_token).map_err(DeckError::UnknownRank)?;
        let suit = Suit::try_from(suit_token).map_err(DeckError::UnknownSuit)?;

        Ok(Card::new(id, rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deck_has_52_unique_cards() {
        for shuffle in [false, true] {
            let deck = Deck::new(shuffle);
            assert_eq!(deck.len(), 52);

            let pairs: HashSet<(Rank, Suit)> =
                deck.cards.iter().map(|c| (c.rank, c.suit)).collect();
            assert_eq!(pairs.len(), 52);

            let ids: HashSet<u32> = deck.cards.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), 52);
        }
    }

    #[test]
    fn test_unshuffled_deck_order() {
        let deck = Deck::new(false);
        // Suit-major build order: spades first, ranks ascending
        assert_eq!(deck.cards[0], Card::new(0, Rank::Two, Suit::Spades));
        assert_eq!(deck.cards[12], Card::new(12, Rank::Ace, Suit::Spades));
        assert_eq!(deck.cards[13], Card::new(13, Rank::Two, Suit::Clubs));
        assert_eq!(deck.cards[51], Card::new(51, Rank::Ace, Suit::Diamonds));
    }

    #[test]
    fn test_draw_removes_cards_from_front() {
        let mut deck = Deck::new(false);
        let first = deck.draw(5);
        assert_eq!(first.len(), 5);
        assert_eq!(deck.len(), 47);
        assert_eq!(first[0].id, 0);

        let second = deck.draw(5);
        assert_eq!(second.len(), 5);
        assert_eq!(deck.len(), 42);

        // Consecutive draws are disjoint
        let first_ids: HashSet<u32> = first.iter().map(|c| c.id).collect();
        assert!(second.iter().all(|c| !first_ids.contains(&c.id)));
    }

    #[test]
    fn test_draw_guard() {
        let mut deck = Deck::new(false);

        // Zero draws are refused
        assert!(deck.draw(0).is_empty());
        assert_eq!(deck.len(), 52);

        // The reservation rule refuses any draw that would not leave more
        // cards behind than it takes: 25 of 52 is the most a full deck gives
        assert!(deck.draw(26).is_empty());
        assert_eq!(deck.len(), 52);
        assert_eq!(deck.draw(25).len(), 25);
        assert_eq!(deck.len(), 27);

        // Oversized requests leave the deck untouched
        assert!(deck.draw(100).is_empty());
        assert_eq!(deck.len(), 27);
    }

    #[test]
    fn test_sort_desc_is_stable_and_idempotent() {
        let cards = vec![
            Card::new(0, Rank::Five, Suit::Clubs),
            Card::new(1, Rank::King, Suit::Hearts),
            Card::new(2, Rank::Five, Suit::Diamonds),
            Card::new(3, Rank::Two, Suit::Spades),
            Card::new(4, Rank::King, Suit::Spades),
        ];

        let sorted = Deck::sort_desc(&cards);
        let ranks: Vec<Rank> = sorted.iter().map(|c| c.rank).collect();
        assert_eq!(
            ranks,
            vec![Rank::King, Rank::King, Rank::Five, Rank::Five, Rank::Two]
        );

        // Equal ranks keep their original relative order
        assert_eq!(sorted[0].id, 1);
        assert_eq!(sorted[1].id, 4);
        assert_eq!(sorted[2].id, 0);
        assert_eq!(sorted[3].id, 2);

        assert_eq!(Deck::sort_desc(&sorted), sorted);
    }

    #[test]
    fn test_serialize_tokens() {
        let cards = vec![
            Card::new(23, Rank::Ace, Suit::Spades),
            Card::new(7, Rank::Ten, Suit::Diamonds),
        ];
        assert_eq!(Deck::serialize(&cards), vec!["23#AS", "7#10D"]);
    }

    #[test]
    fn test_round_trip_whole_deck() {
        let deck = Deck::new(true);
        let tokens = Deck::serialize(&deck.cards);
        let parsed = Deck::deserialize(&tokens).unwrap();
        assert_eq!(parsed, deck.cards);
    }

    #[test]
    fn test_deserialize_rejects_malformed_tokens() {
        assert_eq!(
            Deck::deserialize(&["AS"]),
            Err(DeckError::MalformedToken("AS".to_string()))
        );
        assert_eq!(
            Deck::deserialize(&["x#AS"]),
            Err(DeckError::MalformedToken("x#AS".to_string()))
        );
        assert_eq!(
            Deck::deserialize(&["3#A"]),
            Err(DeckError::MalformedToken("3#A".to_string()))
        );
        assert_eq!(
            Deck::deserialize(&["3#ZS"]),
            Err(DeckError::UnknownRank("Z".to_string()))
        );
        assert_eq!(
            Deck::deserialize(&["3#AX"]),
            Err(DeckError::UnknownSuit("X".to_string()))
        );

        // One bad token fails the whole batch
        assert!(Deck::deserialize(&["3#AS", "oops"]).is_err());
    }
}
