use crate::action::{Action, ActionKind};
use crate::errors::EngineError;
use crate::pot::{build_pots, Pot};
use crate::result::{AnimationSequence, GameActionResult, GameEvent};
use crate::round::Round;
use crate::seat::{Seat, SeatStatus};
use crate::turn::{TurnController, TurnOutcome};
use cards::{Card, Deck, Hand, Street, Strength};
use pcore::{Chips, Epoch, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BettingStructure {
    NoLimit,
    PotLimit,
    FixedLimit,
}

#[derive(Debug, Clone)]
pub struct HandConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub structure: BettingStructure,
    pub rake_percent: f64,
    pub rake_cap_bb: Chips,
    pub no_rake_threshold_bb: Chips,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            small_blind: pcore::DEFAULT_SMALL_BLIND,
            big_blind: pcore::DEFAULT_BIG_BLIND,
            ante: 0,
            structure: BettingStructure::NoLimit,
            rake_percent: pcore::DEFAULT_RAKE_PERCENT,
            rake_cap_bb: pcore::DEFAULT_RAKE_CAP_BB,
            no_rake_threshold_bb: pcore::NO_RAKE_THRESHOLD_BB,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    pub position: Position,
    pub action: Action,
    pub round: Round,
    pub epoch: Epoch,
}

#[derive(Debug, Clone)]
pub struct LegalOptions {
    pub kinds: Vec<ActionKind>,
    pub call_amount: Chips,
    pub min_total: Chips,
    pub max_total: Chips,
}

/// The betting-round / pot / showdown state machine for a single hand.
/// `apply` is the sole entry point that moves chips; callers hold the
/// per-game mutex for the duration of the call and notify clients with
/// the returned [`GameActionResult`] afterward, outside the lock.
#[derive(Debug, Clone)]
pub struct Game {
    pub hand_number: u64,
    pub seats: Vec<Seat>,
    pub community: Vec<Card>,
    pub round: Round,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub button: Position,
    pub config: HandConfig,
    pub action_log: Vec<ActionLogEntry>,
    pub pots: Vec<Pot>,
    /// `(pot index, winning seats, the winning hand's strength — `None`
    /// when the pot was won uncontested and no hand was ever revealed)`.
    pub winners: Vec<(usize, Vec<Position>, Option<Strength>)>,
    pub rake_accumulated: Chips,
    epoch: Epoch,
    turn: TurnController,
    deck: Deck,
}

impl Game {
    pub fn new(seats: Vec<Seat>, button: Position, config: HandConfig) -> Self {
        Self {
            hand_number: 0,
            seats,
            community: Vec::new(),
            round: Round::Preflop,
            current_bet: 0,
            min_raise: config.big_blind,
            button,
            config,
            action_log: Vec::new(),
            pots: Vec::new(),
            winners: Vec::new(),
            rake_accumulated: 0,
            epoch: 0,
            turn: TurnController::new(),
            deck: Deck::new(),
        }
    }

    pub fn current_actor(&self) -> Option<Position> {
        self.turn.current_actor()
    }

    pub fn to_act(&self) -> &std::collections::BTreeSet<Position> {
        self.turn.to_act()
    }

    fn live_ring_from(&self, start: Position) -> Vec<Position> {
        let n = self.seats.len();
        (0..n)
            .map(|offset| (start + offset) % n)
            .filter(|p| self.seats[*p].status != SeatStatus::Out)
            .collect()
    }

    /// Rotates the button, promotes funded `Waiting` seats, resets
    /// per-hand fields, posts antes/blinds, shuffles and deals hole
    /// cards, and opens the preflop betting round.
    pub fn start_hand(&mut self) {
        self.hand_number += 1;
        self.community.clear();
        self.pots.clear();
        self.winners.clear();
        self.rake_accumulated = 0;
        self.action_log.clear();
        self.round = Round::Preflop;
        self.deck = Deck::new();

        for seat in &mut self.seats {
            seat.reset_for_new_hand(self.config.big_blind);
        }

        let live = self.live_ring_from((self.button + 1) % self.seats.len());
        if let Some(&next_button) = live.first() {
            self.button = next_button;
        }

        let active: Vec<Position> = self
            .seats
            .iter()
            .filter(|s| s.status == SeatStatus::Active)
            .map(|s| s.position)
            .collect();

        if active.len() < 2 {
            return;
        }

        let order = self.live_ring_from(self.button);
        let active_order: Vec<Position> = order.into_iter().filter(|p| active.contains(p)).collect();

        let (sb_pos, bb_pos) = if active_order.len() == 2 {
            (active_order[0], active_order[1])
        } else {
            (active_order[1], active_order[2])
        };

        if self.config.ante > 0 {
            for &pos in &active_order {
                let ante = self.config.ante.min(self.seats[pos].chips);
                self.seats[pos].commit(ante);
            }
            for seat in &mut self.seats {
                seat.street_bet = 0;
            }
        }

        let sb_amount = self.config.small_blind.min(self.seats[sb_pos].chips);
        self.seats[sb_pos].commit(sb_amount);
        let bb_amount = self.config.big_blind.min(self.seats[bb_pos].chips);
        self.seats[bb_pos].commit(bb_amount);
        self.log_action(sb_pos, Action::Blind(sb_amount));
        self.log_action(bb_pos, Action::Blind(bb_amount));

        for pass in 0..2 {
            for &pos in &active_order {
                if self.seats[pos].status != SeatStatus::Active {
                    continue;
                }
                let card = self.deck.draw().expect("52-card deck covers 2 passes x 9 seats");
                match &mut self.seats[pos].hole_cards {
                    Some(cards) => cards[pass] = card,
                    None => self.seats[pos].hole_cards = Some([card, card]),
                }
            }
        }

        self.current_bet = self.config.big_blind;
        self.min_raise = self.config.big_blind;

        let first_to_act = if active_order.len() == 2 {
            sb_pos
        } else {
            *active_order
                .iter()
                .cycle()
                .skip_while(|&&p| p != bb_pos)
                .nth(1)
                .unwrap()
        };
        let to_act: Vec<Position> = active_order
            .iter()
            .copied()
            .filter(|p| self.seats[*p].status == SeatStatus::Active)
            .collect();
        self.turn.seed(to_act, first_to_act);
    }

    fn log_action(&mut self, position: Position, action: Action) {
        self.epoch += 1;
        self.action_log.push(ActionLogEntry {
            position,
            action,
            round: self.round,
            epoch: self.epoch,
        });
    }

    fn pot_total(&self) -> Chips {
        self.seats.iter().map(|s| s.hand_bet).sum()
    }

    pub fn legal_options(&self, position: Position) -> Result<LegalOptions, EngineError> {
        if self.current_actor() != Some(position) {
            return Err(EngineError::NotYourTurn);
        }
        let seat = &self.seats[position];
        let mut kinds = vec![ActionKind::Fold];
        let to_call = (self.current_bet - seat.street_bet).max(0);
        let call_amount = to_call.min(seat.chips);

        if to_call == 0 {
            kinds.push(ActionKind::Check);
        } else {
            kinds.push(ActionKind::Call);
        }

        let (mut min_total, mut max_total) = (0, 0);
        if self.current_bet == 0 {
            if seat.chips > 0 {
                kinds.push(ActionKind::Bet);
                min_total = self.config.big_blind.min(seat.chips);
                max_total = seat.chips;
            }
        } else if seat.chips > call_amount {
            kinds.push(ActionKind::Raise);
            min_total = self.current_bet + self.min_raise;
            max_total = seat.chips + seat.street_bet;
        }

        match self.config.structure {
            BettingStructure::NoLimit => {}
            BettingStructure::PotLimit => {
                let cap = self.pot_total() + to_call + call_amount;
                max_total = max_total.min(cap.max(min_total));
            }
            BettingStructure::FixedLimit => {
                let fixed_step = match self.round {
                    Round::Preflop | Round::Flop => self.config.big_blind,
                    _ => self.config.big_blind * 2,
                };
                let fixed_total = self.current_bet + fixed_step;
                min_total = fixed_total.min(seat.chips + seat.street_bet);
                max_total = min_total;
            }
        }

        if seat.chips > 0 {
            kinds.push(ActionKind::AllIn);
        }

        Ok(LegalOptions {
            kinds,
            call_amount,
            min_total,
            max_total,
        })
    }

    /// Validates `action` against the current actor's legal set, moves
    /// chips, and advances the betting round/street/showdown as needed.
    pub fn apply(&mut self, position: Position, action: Action) -> GameActionResult {
        if let Err(e) = self.validate(position, action) {
            return GameActionResult::failure(position, action, e);
        }

        let street_bet_before = self.seats[position].street_bet;
        let current_bet_before = self.current_bet;
        let min_raise_before = self.min_raise;

        match action {
            Action::Fold => {
                self.seats[position].status = SeatStatus::Folded;
            }
            Action::Check => {}
            Action::Call(added) | Action::Bet(added) | Action::AllIn(added) => {
                let added = added.min(self.seats[position].chips);
                self.seats[position].commit(added);
            }
            Action::Raise(new_total) => {
                let added = (new_total - street_bet_before).min(self.seats[position].chips);
                self.seats[position].commit(added);
            }
            Action::Blind(_) => unreachable!("blinds are posted by start_hand, not apply"),
        }

        self.log_action(position, action);
        let new_street_bet = self.seats[position].street_bet;

        if !matches!(action, Action::Fold | Action::Check) && new_street_bet > current_bet_before {
            let increment = new_street_bet - current_bet_before;
            self.current_bet = new_street_bet;
            if increment >= min_raise_before {
                self.min_raise = increment;
                let eligible: Vec<Position> = self
                    .seats
                    .iter()
                    .filter(|s| s.status == SeatStatus::Active)
                    .map(|s| s.position)
                    .collect();
                self.turn.reopen(position, eligible);
            }
        }

        self.turn.consume(position);

        let mut result = GameActionResult {
            success: true,
            error: None,
            acting_seat: position,
            action,
            events: vec![GameEvent::PlayerActionProcessed],
            animation_sequence: AnimationSequence::None,
            pending_streets_to_deal: Vec::new(),
            post_street_bet: self.seats[position].street_bet,
            post_hand_bet: self.seats[position].hand_bet,
            next_actor: None,
        };

        match self.turn.next(self.seats.len(), |p| self.seats[p].status == SeatStatus::Active) {
            TurnOutcome::Actor(next) => {
                result.next_actor = Some(next);
            }
            TurnOutcome::StreetEnded => {
                result.events.push(GameEvent::BettingRoundCompleted);
                self.end_street(&mut result);
            }
        }

        result
    }

    fn validate(&self, position: Position, action: Action) -> Result<(), EngineError> {
        let options = self.legal_options(position)?;
        let seat = &self.seats[position];
        match action {
            Action::Fold => Ok(()),
            Action::Check => options
                .kinds
                .contains(&ActionKind::Check)
                .then_some(())
                .ok_or_else(|| EngineError::InvalidAction("check not legal".into())),
            Action::Call(amount) => {
                if !options.kinds.contains(&ActionKind::Call) {
                    return Err(EngineError::InvalidAction("call not legal".into()));
                }
                if amount != options.call_amount {
                    return Err(EngineError::InvalidAction("call amount mismatch".into()));
                }
                Ok(())
            }
            Action::Bet(amount) => {
                if !options.kinds.contains(&ActionKind::Bet) {
                    return Err(EngineError::InvalidAction("bet not legal".into()));
                }
                if amount < options.min_total || amount > options.max_total {
                    return Err(EngineError::InvalidAction("bet amount out of range".into()));
                }
                Ok(())
            }
            Action::Raise(new_total) => {
                if !options.kinds.contains(&ActionKind::Raise) {
                    return Err(EngineError::InvalidAction("raise not legal".into()));
                }
                if new_total < options.min_total || new_total > options.max_total {
                    return Err(EngineError::InvalidAction("raise amount out of range".into()));
                }
                Ok(())
            }
            Action::AllIn(amount) => {
                if !options.kinds.contains(&ActionKind::AllIn) {
                    return Err(EngineError::InvalidAction("all-in not legal".into()));
                }
                if amount != seat.chips {
                    return Err(EngineError::InvalidAction("all-in must commit entire stack".into()));
                }
                Ok(())
            }
            Action::Blind(_) => Err(EngineError::InvalidAction("blinds are not a player action".into())),
        }
    }

    /// `to_act` just emptied: decide whether the street continues, the
    /// board runs out with no further betting, or the hand is over.
    fn end_street(&mut self, result: &mut GameActionResult) {
        let non_folded: Vec<Position> = self
            .seats
            .iter()
            .filter(|s| s.status != SeatStatus::Folded && s.status != SeatStatus::Out)
            .map(|s| s.position)
            .collect();

        if non_folded.len() <= 1 {
            result.events.push(GameEvent::EarlyShowdownTriggered);
            result.animation_sequence = AnimationSequence::ShowdownReveal;
            self.settle(&non_folded);
            result.events.push(GameEvent::HandCompleted);
            return;
        }

        let can_still_bet = non_folded
            .iter()
            .filter(|&&p| self.seats[p].status == SeatStatus::Active && self.seats[p].chips > 0)
            .count()
            >= 2;

        if can_still_bet && self.round != Round::Showdown {
            if let Some(street) = self.round.street().map(|s| s.next()).flatten() {
                self.deal_street(Round::from(street));
                result.events.push(GameEvent::StreetDealingRequired);
                result.animation_sequence = AnimationSequence::StreetDealing;
                let to_act: Vec<Position> = non_folded
                    .iter()
                    .copied()
                    .filter(|p| self.seats[*p].status == SeatStatus::Active)
                    .collect();
                let first = self
                    .live_ring_from((self.button + 1) % self.seats.len())
                    .into_iter()
                    .find(|p| to_act.contains(p))
                    .unwrap_or(to_act[0]);
                self.turn.seed(to_act, first);
                result.next_actor = self.turn.current_actor();
                return;
            }
        }

        result.events.push(GameEvent::ShowdownTriggered);
        result.animation_sequence = AnimationSequence::ShowdownReveal;
        while let Some(street) = self.round.street().map(|s| s.next()).flatten() {
            let round = Round::from(street);
            let cards = self.deal_street(round);
            result.pending_streets_to_deal.push((street, cards));
        }
        self.round = Round::Showdown;
        self.settle(&non_folded);
        result.events.push(GameEvent::HandCompleted);
    }

    /// Deals the next street's community cards, resets street bets, and
    /// returns the cards dealt (also recorded into `self.community`).
    fn deal_street(&mut self, round: Round) -> Vec<Card> {
        self.round = round;
        let street = round.street().expect("deal_street called with a real street");
        let mut dealt = Vec::new();
        for _ in 0..street.n_revealed() {
            if let Some(card) = self.deck.draw() {
                self.community.push(card);
                dealt.push(card);
            }
        }
        for seat in &mut self.seats {
            seat.reset_for_new_street();
        }
        self.current_bet = 0;
        self.min_raise = self.config.big_blind;
        dealt
    }

    /// Builds side pots, skims rake, evaluates showdown strength among
    /// eligible non-folded seats, and awards chips.
    fn settle(&mut self, non_folded: &[Position]) {
        self.round = Round::Showdown;
        self.pots = build_pots(&self.seats);

        let reveal = non_folded.len() > 1;
        let strengths: std::collections::HashMap<Position, Strength> = if reveal {
            non_folded
                .iter()
                .filter_map(|&p| {
                    let hole = self.seats[p].hole_cards?;
                    let hand: Hand = hole
                        .into_iter()
                        .chain(self.community.iter().copied())
                        .collect();
                    Some((p, Strength::from(hand)))
                })
                .collect()
        } else {
            std::collections::HashMap::new()
        };

        for (index, pot) in self.pots.clone().iter().enumerate() {
            let rake = self.rake_for(pot.amount);
            let distributable = pot.amount - rake;
            self.rake_accumulated += rake;

            let best = if reveal {
                pot.eligible
                    .iter()
                    .filter_map(|p| strengths.get(p).map(|s| (*p, *s)))
                    .max_by_key(|(_, s)| *s)
            } else {
                None
            };
            let winning_strength = best.map(|(_, s)| s);
            let winners: Vec<Position> = match best {
                Some((_, best_strength)) => pot
                    .eligible
                    .iter()
                    .copied()
                    .filter(|p| strengths.get(p) == Some(&best_strength))
                    .collect(),
                None => pot.eligible.iter().copied().collect(),
            };

            if winners.is_empty() {
                continue;
            }
            let share = distributable / winners.len() as Chips;
            let remainder = distributable - share * winners.len() as Chips;
            let ordered = self.clockwise_from_button(&winners);
            for (i, &w) in ordered.iter().enumerate() {
                let bonus = if (i as Chips) < remainder { 1 } else { 0 };
                self.seats[w].chips += share + bonus;
            }
            self.winners.push((index, winners, winning_strength));
        }
    }

    fn rake_for(&self, pot_amount: Chips) -> Chips {
        if pot_amount < self.config.no_rake_threshold_bb * self.config.big_blind {
            return 0;
        }
        let cap = self.config.rake_cap_bb * self.config.big_blind;
        let skim = ((pot_amount as f64) * self.config.rake_percent).floor() as Chips;
        skim.min(cap)
    }

    fn clockwise_from_button(&self, positions: &[Position]) -> Vec<Position> {
        let order = self.live_ring_from((self.button + 1) % self.seats.len());
        let mut ordered: Vec<Position> = order.into_iter().filter(|p| positions.contains(p)).collect();
        for &p in positions {
            if !ordered.contains(&p) {
                ordered.push(p);
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_seats(stack_a: Chips, stack_b: Chips) -> Game {
        let seats = vec![
            Seat::new(0, "a", true, stack_a),
            Seat::new(1, "b", true, stack_b),
        ];
        let mut game = Game::new(seats, 0, HandConfig {
            small_blind: 10,
            big_blind: 20,
            ..HandConfig::default()
        });
        game.start_hand();
        game
    }

    #[test]
    fn heads_up_button_is_small_blind_and_acts_first() {
        let game = two_seats(1000, 1000);
        // heads-up: button posts SB and acts first preflop
        assert_eq!(game.seats[0].street_bet, 10);
        assert_eq!(game.seats[1].street_bet, 20);
        assert_eq!(game.current_actor(), Some(0));
    }

    #[test]
    fn heads_up_runs_to_a_single_pot_with_no_rake() {
        let mut game = two_seats(1000, 1000);
        let r1 = game.apply(0, Action::Call(10));
        assert!(r1.success);
        assert!(!r1.has_event(GameEvent::BettingRoundCompleted));
        let r2 = game.apply(1, Action::Check);
        assert!(r2.has_event(GameEvent::BettingRoundCompleted));
        assert_eq!(game.round, Round::Flop);
        assert_eq!(game.current_actor(), Some(1));

        while game.round != Round::Showdown {
            let actor = game.current_actor().expect("hand not yet at showdown");
            let result = game.apply(actor, Action::Check);
            assert!(result.success, "{:?}", result.error);
        }

        assert_eq!(game.pots.len(), 1);
        assert_eq!(game.pots[0].amount, 40);
        assert_eq!(game.rake_accumulated, 0);
    }

    #[test]
    fn three_way_all_in_builds_single_pot_when_contributions_match() {
        // All three start with the same stack and all three shove, so once
        // the blinds are deducted every seat's all-in closes out its stack
        // exactly at 200 committed chips: one pot, no side pots, no further
        // betting possible, straight to showdown.
        let seats = vec![
            Seat::new(0, "a", true, 200),
            Seat::new(1, "b", true, 200),
            Seat::new(2, "c", true, 200),
        ];
        let mut game = Game::new(seats, 0, HandConfig {
            small_blind: 10,
            big_blind: 20,
            ..HandConfig::default()
        });
        game.start_hand();

        let actor = game.current_actor().unwrap();
        assert_eq!(actor, 0);
        let r1 = game.apply(0, Action::AllIn(200));
        assert!(r1.success, "{:?}", r1.error);
        let r2 = game.apply(1, Action::AllIn(190));
        assert!(r2.success, "{:?}", r2.error);
        let r3 = game.apply(2, Action::AllIn(180));
        assert!(r3.success, "{:?}", r3.error);

        assert_eq!(game.round, Round::Showdown);
        assert_eq!(game.community.len(), 5);
        assert_eq!(game.pots.len(), 1);
        assert_eq!(game.pots[0].amount, 600);
        assert_eq!(game.pots[0].eligible.len(), 3);
    }

    #[test]
    fn short_all_in_does_not_reopen_action_for_earlier_actor() {
        // b is the short stack: its eventual all-in raise (80 -> 100) is an
        // increment of only 20, below the 60-chip min_raise set by a's
        // opening raise, so it must not give a another turn.
        let seats = vec![
            Seat::new(0, "a", true, 1000),
            Seat::new(1, "b", true, 100),
            Seat::new(2, "c", true, 1000),
        ];
        let mut game = Game::new(seats, 0, HandConfig {
            small_blind: 10,
            big_blind: 20,
            ..HandConfig::default()
        });
        game.start_hand();

        // 3-handed: button is also preflop UTG, so seat 0 (the button) acts first.
        assert_eq!(game.current_actor(), Some(0));
        let r1 = game.apply(0, Action::Raise(80));
        assert!(r1.success, "{:?}", r1.error);
        assert_eq!(game.current_actor(), Some(1));

        let r2 = game.apply(1, Action::AllIn(90));
        assert!(r2.success, "{:?}", r2.error);
        assert_eq!(game.current_bet, 100);
        // b's raise was short of a full raise: a must not be owed another turn.
        assert!(!game.to_act().contains(&0));
        assert_eq!(game.current_actor(), Some(2));

        let r3 = game.apply(2, Action::Call(game.legal_options(2).unwrap().call_amount));
        assert!(r3.success, "{:?}", r3.error);
        assert!(r3.has_event(GameEvent::BettingRoundCompleted));

        // a never matched the extra 20 that only b and c put in.
        assert_eq!(game.seats[0].street_bet, 80);
    }

    #[test]
    fn double_action_from_the_same_seat_fails() {
        let mut game = two_seats(1000, 1000);
        let actor = game.current_actor().unwrap();
        let r1 = game.apply(actor, Action::Call(10));
        assert!(r1.success);
        let r2 = game.apply(actor, Action::Check);
        assert!(!r2.success);
        assert_eq!(r2.error, Some(EngineError::NotYourTurn));
    }

    #[test]
    fn chip_conservation_holds_after_a_full_hand() {
        let mut game = two_seats(500, 500);
        let total_before: Chips = game.seats.iter().map(|s| s.chips).sum::<Chips>()
            + game.seats.iter().map(|s| s.street_bet).sum::<Chips>();

        loop {
            let actor = match game.current_actor() {
                Some(a) => a,
                None => break,
            };
            let opts = game.legal_options(actor).unwrap();
            let action = if opts.kinds.contains(&ActionKind::Check) {
                Action::Check
            } else {
                Action::Call(opts.call_amount)
            };
            let result = game.apply(actor, action);
            assert!(result.success, "{:?}", result.error);
            if game.round == Round::Showdown {
                break;
            }
        }

        let total_after: Chips =
            game.seats.iter().map(|s| s.chips).sum::<Chips>() + game.rake_accumulated;
        assert_eq!(total_before, total_after);
    }
}
