use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ranking::{classify, HandRanking};
use crate::cards::{Card, Deck, Rank};

pub const HAND_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PokerError {
    #[error("Card not in hand: {0}")]
    CardNotInHand(Card),
    #[error("Deck cannot supply a replacement card")]
    DeckStarved,
    #[error("Hands must contain exactly 5 cards")]
    InvalidHandSize,
    #[error("No players to evaluate")]
    NoPlayers,
}

/// One participant in the showdown: an id and the 5 cards they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub hand: Vec<Card>,
}

/// Classification outcome for one hand. `high_card` is set only for High
/// Card and is the sole tie-break dimension between High Card hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub id: String,
    pub ranking: HandRanking,
    pub high_card: Option<Rank>,
}

impl HandResult {
    pub fn name(&self) -> &'static str {
        self.ranking.name()
    }
}

/// Deals, replaces and scores hands against a deck it owns. All card state
/// lives in the deck; the evaluator adds no bookkeeping of its own.
#[derive(Debug)]
pub struct HandEvaluator {
    deck: Deck,
}

impl HandEvaluator {
    pub fn new(deck: Deck) -> Self {
        Self { deck }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    /// Draw a fresh 5-card hand. Empty under the deck's reservation guard;
    /// callers check before proceeding.
    pub fn deal_hand(&mut self) -> Vec<Card> {
        let hand = self.deck.draw(HAND_SIZE);
        debug!(dealt = hand.len(), remaining = self.deck.len(), "dealt hand");
        hand
    }

    /// Swap one card of `hand` for a fresh draw. The card is located by its
    /// id; the new hand keeps the replaced card's position. Returns the new
    /// hand and the drawn card, leaving the caller's hand untouched.
    pub fn replace(&mut self, card: &Card, hand: &[Card]) -> Result<(Vec<Card>, Card), PokerError> {
        let position = hand
            .iter()
            .position(|held| held.id == card.id)
            .ok_or(PokerError::CardNotInHand(*card))?;

        let new_card = self
            .deck
            .draw(1)
            .pop()
            .ok_or(PokerError::DeckStarved)?;

        let mut new_hand = hand.to_vec();
        new_hand[position] = new_card;

        debug!(replaced = %card, drawn = %new_card, position, "replaced card");
        Ok((new_hand, new_card))
    }

    /// Score every player's hand and return the winner.
    ///
    /// Results order by category weight, then by top-card rank when both
    /// sides are High Card. Other equal-category ties are left to sort
    /// stability: the first-submitted of the tied players wins.
    pub fn winner(&self, players: &[Player]) -> Result<HandResult, PokerError> {
        if players.is_empty() {
            return Err(PokerError::NoPlayers);
        }

        let mut results = Vec::with_capacity(players.len());
        for player in players {
            if player.hand.len() != HAND_SIZE {
                return Err(PokerError::InvalidHandSize);
            }

            let sorted = Deck::sort_desc(&player.hand);
            let (ranking, high_card) = classify(&sorted);
            results.push(HandResult {
                id: player.id.clone(),
                ranking,
                high_card,
            });
        }

        results.sort_by(|a, b| {
            if a.ranking == HandRanking::HighCard && b.ranking == HandRanking::HighCard {
                b.high_card.cmp(&a.high_card)
            } else {
                b.ranking.cmp(&a.ranking)
            }
        });

        let best = results.into_iter().next().ok_or(PokerError::NoPlayers)?;
        info!(winner = %best.id, ranking = best.name(), "showdown scored");
        Ok(best)
    }
}
