use std::fmt;

use crate::cards::{Card, Rank};

/// The ten hand categories, ordered by weight. Weights match the prize
/// table the table layer indexes by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HandRanking {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandRanking {
    pub fn weight(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            HandRanking::HighCard => "High Card",
            HandRanking::Pair => "Pair",
            HandRanking::TwoPair => "Two Pair",
            HandRanking::ThreeOfAKind => "Three-of-a-Kind",
            HandRanking::Straight => "Straight",
            HandRanking::Flush => "Flush",
            HandRanking::FullHouse => "Full House",
            HandRanking::FourOfAKind => "Four-of-a-Kind",
            HandRanking::StraightFlush => "Straight Flush",
            HandRanking::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PartialOrd for HandRanking {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRanking {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

/// Per-rank occurrence counts over one hand. The paired-category predicates
/// all read off this table; they are not mutually exclusive (a full house
/// also has three-of-a-kind and a pair), so only the precedence order in
/// `classify` disambiguates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankCounts([u8; 13]);

impl RankCounts {
    pub fn of(cards: &[Card]) -> Self {
        let mut counts = [0u8; 13];
        for card in cards {
            counts[(card.rank.value() - 1) as usize] += 1;
        }
        Self(counts)
    }

    pub fn four_of_a_kind(&self) -> bool {
        self.0.contains(&4)
    }

    pub fn full_house(&self) -> bool {
        self.three_of_a_kind() && self.pair()
    }

    pub fn three_of_a_kind(&self) -> bool {
        self.0.contains(&3)
    }

    pub fn two_pair(&self) -> bool {
        self.0.iter().filter(|&&count| count == 2).count() == 2
    }

    pub fn pair(&self) -> bool {
        self.0.contains(&2)
    }
}

/// Ends-only straight test over a rank-descending sorted hand: the top and
/// bottom ranks must be exactly four apart. Interior cards are not checked,
/// and the ace never plays low, so A-2-3-4-5 does not qualify. Both quirks
/// are part of the scoring contract; see DESIGN.md before changing either.
fn is_straight(sorted: &[Card]) -> bool {
    let first = sorted[0].rank.value() as i16;
    let last = sorted[sorted.len() - 1].rank.value() as i16;
    first - last == 4
}

fn is_flush(cards: &[Card]) -> bool {
    cards.iter().all(|card| card.suit == cards[0].suit)
}

fn has_ace(cards: &[Card]) -> bool {
    cards.iter().any(|card| card.rank == Rank::Ace)
}

/// Classify a rank-descending sorted 5-card hand. Returns the category and,
/// for High Card only, the top card's rank (the sole tie-break dimension).
///
/// The straight/flush family is tested before the paired family, so a hand
/// that passes the permissive straight test scores as a straight even when
/// it also holds pairs.
pub fn classify(sorted: &[Card]) -> (HandRanking, Option<Rank>) {
    let straight = is_straight(sorted);
    let flush = is_flush(sorted);

    let ranking = if straight && flush && has_ace(sorted) {
        HandRanking::RoyalFlush
    } else if straight && flush {
        HandRanking::StraightFlush
    } else if straight {
        HandRanking::Straight
    } else if flush {
        HandRanking::Flush
    } else {
        let counts = RankCounts::of(sorted);
        if counts.four_of_a_kind() {
            HandRanking::FourOfAKind
        } else if counts.full_house() {
            HandRanking::FullHouse
        } else if counts.three_of_a_kind() {
            HandRanking::ThreeOfAKind
        } else if counts.two_pair() {
            HandRanking::TwoPair
        } else if counts.pair() {
            HandRanking::Pair
        } else {
            HandRanking::HighCard
        }
    };

    let high_card = (ranking == HandRanking::HighCard).then(|| sorted[0].rank);
    (ranking, high_card)
}
