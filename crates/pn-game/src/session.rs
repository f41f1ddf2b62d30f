//! Press conference session management.
//!
//! `Game` owns everything a running press conference needs: the persona
//! roster, the crowd, the chat history, the clock, and a handle to the market
//! actor. External calls are awaited one at a time; their results are staged
//! and only committed to the history once every call of the turn succeeded.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use pn_core::{
    CoreError, Crowd, GameClock, GameStatus, MemberId, Persona, PriceSnapshot, PriceState, TalkedAgents,
    default_roster, persona_at,
};
use pn_dialogue::{
    ChatHistory, ChatMessage, ChatTurn, CompanyProfile, DialogueService, Evaluation, Reply,
    Transcoder,
};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::market::MarketHandle;

/// The exchange with the reporter at the microphone.
#[derive(Debug, Clone)]
struct Conversation {
    member_id: MemberId,
    persona_index: usize,
    messages: Vec<ChatMessage>,
}

/// What came of one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    /// The judgment of the answer.
    pub evaluation: Evaluation,
    /// The reporter's response.
    pub reply: Reply,
    /// Market state right after the trend was applied.
    pub price: PriceSnapshot,
    /// Whether the reporter sat down.
    pub conversation_ended: bool,
}

/// Final numbers of a finished game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    /// The company that was defended.
    pub company: CompanyProfile,
    /// Closing price.
    pub final_price: f64,
    /// Change since the open, in percent.
    pub change_percent: f64,
    /// Market ticks played.
    pub ticks: usize,
    /// Chat turns recorded.
    pub turns: usize,
}

/// A press conference.
pub struct Game<S, T> {
    service: S,
    transcoder: T,
    config: GameConfig,
    roster: Vec<Persona>,
    rng: StdRng,
    company: CompanyProfile,
    crowd: Crowd,
    talked: TalkedAgents,
    history: ChatHistory,
    conversation: Option<Conversation>,
    market: Option<MarketHandle>,
    closed_market: Option<PriceState>,
    clock: GameClock,
    epoch: u64,
}

impl<S: DialogueService, T: Transcoder> Game<S, T> {
    /// Create an idle game with the default persona roster.
    pub fn new(service: S, transcoder: T, config: GameConfig) -> GameResult<Self> {
        let clock = GameClock::new(config.duration_secs)?;
        let roster = default_roster();
        Ok(Self {
            service,
            transcoder,
            rng: StdRng::seed_from_u64(config.seed),
            talked: TalkedAgents::new(roster.len()),
            roster,
            config,
            company: CompanyProfile::default(),
            crowd: Crowd::default(),
            history: ChatHistory::new(),
            conversation: None,
            market: None,
            closed_market: None,
            clock,
            epoch: 0,
        })
    }

    /// Replace the persona roster. Takes effect at the next `start_game`.
    pub fn with_roster(mut self, roster: Vec<Persona>) -> GameResult<Self> {
        if roster.is_empty() {
            return Err(GameError::Configuration(
                "persona roster is empty".to_string(),
            ));
        }
        self.talked = TalkedAgents::new(roster.len());
        self.roster = roster;
        Ok(self)
    }

    /// The company being defended.
    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    /// The current crowd.
    pub fn crowd(&self) -> &Crowd {
        &self.crowd
    }

    /// Personas who have spoken this round.
    pub fn talked(&self) -> &TalkedAgents {
        &self.talked
    }

    /// Everything said so far.
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// The persona roster.
    pub fn roster(&self) -> &[Persona] {
        &self.roster
    }

    /// The active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The persona at the microphone, if any.
    pub fn active_persona(&self) -> Option<&Persona> {
        self.conversation
            .as_ref()
            .and_then(|c| self.roster.get(c.persona_index))
    }

    /// Lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.clock.status()
    }

    /// Seconds left on the clock.
    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_secs(Utc::now())
    }

    /// Whether the clock has run out while still marked as playing.
    pub fn is_expired(&self) -> bool {
        self.clock.status() == GameStatus::Playing && self.clock.is_expired(Utc::now())
    }

    /// Counter bumped on every start and finish.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a new game: invent the company, reset the market, crowd, and
    /// history, and start the clock.
    ///
    /// A failed company request falls back to the default company; missing
    /// credentials still fail.
    pub async fn start_game(&mut self) -> GameResult<&CompanyProfile> {
        if let Some(market) = self.market.take() {
            market.shutdown().await?;
        }
        self.epoch += 1;

        self.company = match self.service.company_profile().await {
            Ok(company) => company,
            Err(e) if e.is_configuration() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "company generation failed, using default");
                CompanyProfile::default()
            }
        };

        self.crowd = Crowd::generate(self.roster.len(), &self.config.crowd, &mut self.rng);
        self.talked = TalkedAgents::new(self.roster.len());
        self.history = ChatHistory::new();
        self.conversation = None;
        self.closed_market = None;

        let market_rng = StdRng::seed_from_u64(self.rng.random());
        let tick_every = self.config.auto_tick.then_some(self.config.tick_interval);
        self.market = Some(MarketHandle::spawn(
            PriceState::new(&self.config.market),
            market_rng,
            tick_every,
        ));
        self.clock.start(Utc::now());

        info!(
            epoch = self.epoch,
            company = %self.company.company_name,
            ceo = %self.company.ceo_name,
            members = self.crowd.len(),
            duration_secs = self.clock.duration_secs(),
            "press conference started"
        );
        Ok(&self.company)
    }

    /// Call on a crowd member with a raised hand and get their opening question.
    ///
    /// A reporter already at the microphone is sent back to their seat.
    pub async fn call_on(&mut self, member_id: MemberId) -> GameResult<Reply> {
        self.ensure_playing().await?;
        let epoch = self.epoch;

        let mut crowd = self.crowd.clone();
        if let Some(current) = &self.conversation {
            crowd = crowd.release(current.member_id)?;
        }
        let crowd = crowd.claim(member_id)?;
        let persona_index = crowd
            .get(member_id)
            .map(|m| m.persona_index)
            .ok_or(CoreError::UnknownMember(member_id))?;
        let persona = persona_at(&self.roster, persona_index)?.clone();

        let reply = self
            .service
            .opening_question(&persona, &self.company)
            .await?;
        self.ensure_current(epoch).await?;

        if let Some(previous) = self.conversation.take() {
            debug!(member = %previous.member_id, "previous reporter sat down");
        }
        if self.talked.record(persona_index) {
            debug!("every persona has talked, starting a new round");
        }
        self.crowd = crowd;
        let message = ChatMessage::assistant(reply.transcript.clone());
        self.history
            .append(ChatTurn::new(message.clone(), persona.name.clone()));
        self.conversation = Some(Conversation {
            member_id,
            persona_index,
            messages: vec![message],
        });

        info!(member = %member_id, reporter = %persona.name, "reporter called on");
        Ok(reply)
    }

    /// Answer the reporter at the microphone with recorded audio.
    ///
    /// Runs transcode, evaluation, and the reporter's reply in that order.
    /// The trend is applied and both turns are committed only once all of
    /// them succeeded; on any failure market and history are left as they
    /// were.
    pub async fn answer(&mut self, raw_audio: &[u8]) -> GameResult<TurnOutcome> {
        self.ensure_playing().await?;
        let epoch = self.epoch;
        let conversation = self
            .conversation
            .clone()
            .ok_or(GameError::NoActiveConversation)?;
        let persona = persona_at(&self.roster, conversation.persona_index)?.clone();

        let wav = self.transcoder.transcode(raw_audio).await?;
        let answer = ChatMessage::user_audio(wav.to_base64());
        let mut staged = conversation.messages.clone();
        staged.push(answer.clone());

        let evaluation = self
            .service
            .evaluate(&persona, &self.company, &staged)
            .await?;
        let reply = self
            .service
            .reply(
                &persona,
                &self.company,
                &staged,
                evaluation.end_of_conversation,
            )
            .await?;
        self.ensure_current(epoch).await?;

        // market and history move together, after every external call
        let market = self.market.as_ref().ok_or(GameError::MarketClosed)?;
        market.apply_trend(evaluation.score).await?;
        let price = market.snapshot().await?;

        let reply_message = ChatMessage::assistant(reply.transcript.clone());
        self.history.commit([
            ChatTurn::new(answer, self.company.ceo_name.clone()).with_score(evaluation.score),
            ChatTurn::new(reply_message.clone(), persona.name.clone()),
        ]);
        staged.push(reply_message);

        let ended = evaluation.end_of_conversation;
        if ended {
            self.crowd = self.crowd.release(conversation.member_id)?;
            self.conversation = None;
            self.raise_hands();
        } else {
            self.conversation = Some(Conversation {
                messages: staged,
                ..conversation
            });
        }

        info!(
            reporter = %persona.name,
            score = evaluation.score,
            ended,
            price = price.price,
            "answer judged"
        );
        Ok(TurnOutcome {
            evaluation,
            reply,
            price,
            conversation_ended: ended,
        })
    }

    /// Advance the market by one tick, for games without an automatic timer.
    pub async fn tick(&self) -> GameResult<()> {
        self.market
            .as_ref()
            .ok_or(GameError::MarketClosed)?
            .tick()
            .await
    }

    /// Current market state, or the closing state once the game is over.
    pub async fn snapshot(&self) -> GameResult<PriceSnapshot> {
        match (&self.market, &self.closed_market) {
            (Some(market), _) => market.snapshot().await,
            (None, Some(state)) => Ok(state.snapshot()),
            (None, None) => Err(GameError::MarketClosed),
        }
    }

    /// Every price sample so far.
    pub async fn price_history(&self) -> GameResult<Vec<f64>> {
        match (&self.market, &self.closed_market) {
            (Some(market), _) => market.history().await,
            (None, Some(state)) => Ok(state.history().to_vec()),
            (None, None) => Err(GameError::MarketClosed),
        }
    }

    /// End the game: stop the market, stop the clock, and drop the active
    /// conversation. Calling it again returns the same summary.
    pub async fn finish(&mut self) -> GameResult<GameSummary> {
        if self.clock.status() == GameStatus::Idle {
            return Err(GameError::NotPlaying);
        }
        if let Some(market) = self.market.take() {
            self.epoch += 1;
            self.closed_market = Some(market.shutdown().await?);
            self.clock.finish(Utc::now());
            if let Some(conversation) = self.conversation.take() {
                self.crowd = self.crowd.release(conversation.member_id)?;
            }
        }

        let state = self.closed_market.as_ref().ok_or(GameError::MarketClosed)?;
        let summary = GameSummary {
            company: self.company.clone(),
            final_price: state.current_price(),
            change_percent: state.change_percent(),
            ticks: state.ticks(),
            turns: self.history.len(),
        };
        info!(
            final_price = summary.final_price,
            change_percent = summary.change_percent,
            turns = summary.turns,
            "press conference finished"
        );
        Ok(summary)
    }

    /// Re-raise hands, starting a new round when nobody is left to ask.
    fn raise_hands(&mut self) {
        let hands = self.config.crowd.hands;
        let crowd = self.crowd.with_hands_raised(&self.talked, hands, &mut self.rng);
        if crowd.raised().next().is_some() {
            self.crowd = crowd;
            return;
        }
        debug!(talked = self.talked.len(), "no hands left, resetting round");
        self.talked.reset();
        self.crowd = self.crowd.with_hands_raised(&self.talked, hands, &mut self.rng);
    }

    async fn ensure_playing(&mut self) -> GameResult<()> {
        if self.clock.status() != GameStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        if self.clock.is_expired(Utc::now()) {
            self.finish().await?;
            return Err(GameError::NotPlaying);
        }
        Ok(())
    }

    /// Drop results that arrive after the game they belong to has ended.
    async fn ensure_current(&mut self, epoch: u64) -> GameResult<()> {
        if self.epoch != epoch {
            debug!(epoch, current = self.epoch, "discarding stale reply");
            return Err(GameError::NotPlaying);
        }
        self.ensure_playing().await
    }
}
