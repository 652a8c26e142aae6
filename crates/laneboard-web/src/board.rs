#![forbid(unsafe_code)]

//! The mountable lane board.
//!
//! [`LaneBoard`] owns the local [`LaneModel`] view, the one
//! [`DragController`], both input adapters and the auto-scroll loop. The host
//! forwards input events and animation frames; the board answers with
//! dispatch records and queues move requests for the external data layer.
//!
//! # Teardown
//!
//! Drop, touch-cancel, pointer drag-end, [`LaneBoard::cancel_drag`], a
//! refresh that loses the dragged card, and [`LaneBoard::unmount`] all end in
//! the same private `teardown`, which stops the scroll loop, clears touch and
//! pointer state, restores page interaction and ends the drag session.
//!
//! # Moves
//!
//! A resolved drop is applied to the local model at once and queued as a
//! [`MoveRequest`]. The host sends queued requests to its data layer and
//! reports each result with [`LaneBoard::complete_move`]. A rejected move is
//! rolled back to the card's origin placement, unless the card has been moved
//! again since, and the error goes to the board's [`ErrorSink`].

use std::collections::HashSet;

use laneboard_core::{
    BeginDrag, BoardConfig, BoardError, BoardSource, Card, CardId, CardMover, DragController,
    DropDecision, DropResolver, ErrorSink, LaneId, LaneModel, MoveId, MoveRejected, MovePlan,
    MoveRequest, Point, WipMonitor, WipReport,
};
use serde::Serialize;

use crate::auto_scroll::{AutoScroller, FrameOutcome, FrameToken};
use crate::live_pointer::LivePointer;
use crate::pointer::{DropEffect, PointerDragAdapter};
use crate::surface::{BoardSurface, PageInteraction, resolve_lane_at};
use crate::touch::{PreviewFrame, TouchDispatch, TouchDragAdapter, TouchOutcome, TouchPhase};

/// Requests the board raises for collaborators outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    /// The lane's "add card" affordance was used.
    CreateCardRequested { lane_id: LaneId },
    /// A card was clicked.
    CardOpened { card_id: CardId },
}

/// How a completed move settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSettled {
    Confirmed,
    /// Rejected; the card is back at its origin placement.
    RolledBack,
    /// Rejected, but the card moved again since; left where it is.
    Superseded,
    /// No in-flight move has this id.
    Unknown,
}

#[derive(Debug, Clone)]
struct InFlightMove {
    request: MoveRequest,
    plan: MovePlan,
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Render state of one lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneView {
    pub lane_id: LaneId,
    pub title: String,
    /// Visible cards, sorted by order.
    pub cards: Vec<CardId>,
    /// WIP count over every card in the lane, filtered or not.
    pub count: usize,
    pub limit: Option<u32>,
    pub over_limit: bool,
    /// Hovered by the active drag and able to accept it.
    pub is_drop_target: bool,
    /// Lane the active drag started from.
    pub is_origin: bool,
}

/// Render state of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub lanes: Vec<LaneView>,
    pub preview: Option<PreviewFrame>,
    pub dragging: Option<CardId>,
}

// ---------------------------------------------------------------------------
// LaneBoard
// ---------------------------------------------------------------------------

pub struct LaneBoard {
    model: LaneModel,
    filter: Option<HashSet<CardId>>,
    config: BoardConfig,
    sink: Box<dyn ErrorSink>,
    controller: DragController,
    pointer: PointerDragAdapter,
    touch: TouchDragAdapter,
    scroller: AutoScroller,
    touch_hover: Option<LaneId>,
    page_suppressed: bool,
    next_move_id: u64,
    outbox: Vec<MoveRequest>,
    in_flight: Vec<InFlightMove>,
    events: Vec<BoardEvent>,
}

impl std::fmt::Debug for LaneBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaneBoard")
            .field("lanes", &self.model.lanes().len())
            .field("cards", &self.model.cards().len())
            .field("dragging", &self.controller.current_drag().map(|s| &s.card_id))
            .field("auto_scrolling", &self.scroller.is_running())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl LaneBoard {
    /// Read the board from `source`.
    ///
    /// `filter`, when given, is a pre-filtered card list: only those cards are
    /// shown, while ordering and WIP counts still use every card.
    pub fn mount<S: BoardSource + ?Sized>(
        source: &S,
        filter: Option<Vec<Card>>,
        config: BoardConfig,
        sink: Box<dyn ErrorSink>,
    ) -> Result<Self, BoardError> {
        let model = source.load_model()?;
        let live = LivePointer::new();
        tracing::debug!(
            target: "laneboard.board",
            lanes = model.lanes().len(),
            cards = model.cards().len(),
            filtered = filter.is_some(),
            "board mounted"
        );
        Ok(Self {
            model,
            filter: filter.map(|cards| cards.into_iter().map(|card| card.id).collect()),
            config,
            sink,
            controller: DragController::new(),
            pointer: PointerDragAdapter::new(),
            touch: TouchDragAdapter::new(live.clone(), config.preview),
            scroller: AutoScroller::new(live),
            touch_hover: None,
            page_suppressed: false,
            next_move_id: 0,
            outbox: Vec::new(),
            in_flight: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Re-read the board from `source`.
    ///
    /// In-flight moves are re-applied on top of the fresh data. If the dragged
    /// card no longer exists the drag is cancelled.
    pub fn refresh<S, B>(&mut self, source: &S, surface: &mut B) -> Result<(), BoardError>
    where
        S: BoardSource + ?Sized,
        B: BoardSurface + ?Sized,
    {
        let mut model = source.load_model()?;
        for pending in &self.in_flight {
            let request = &pending.request;
            if model.card(&request.card_id).is_some() && model.lane(&request.to_lane).is_some() {
                model.apply_move(&request.card_id, &request.to_lane, request.new_order)?;
            }
        }
        self.model = model;

        let vanished = self
            .controller
            .current_drag()
            .is_some_and(|session| self.model.card(&session.card_id).is_none());
        if vanished {
            tracing::debug!(target: "laneboard.board", "dragged card vanished on refresh");
            self.teardown(surface);
        }
        Ok(())
    }

    /// Replace the pre-filtered card list.
    pub fn set_filter(&mut self, filter: Option<Vec<Card>>) {
        self.filter = filter.map(|cards| cards.into_iter().map(|card| card.id).collect());
    }

    #[must_use]
    pub fn model(&self) -> &LaneModel {
        &self.model
    }

    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    #[must_use]
    pub fn wip(&self) -> WipReport {
        WipMonitor::evaluate(&self.model)
    }

    #[must_use]
    pub const fn is_auto_scrolling(&self) -> bool {
        self.scroller.is_running()
    }

    #[must_use]
    pub const fn auto_scroller(&self) -> &AutoScroller {
        &self.scroller
    }

    #[must_use]
    pub const fn is_page_suppressed(&self) -> bool {
        self.page_suppressed
    }

    // -- pointer ------------------------------------------------------------

    pub fn pointer_drag_start(&mut self, card_id: &CardId) -> BeginDrag {
        let Some(card) = self.model.card(card_id) else {
            return BeginDrag::Ignored;
        };
        self.pointer.drag_start(&mut self.controller, card)
    }

    pub fn pointer_drag_over(&mut self, lane: Option<&LaneId>) -> DropEffect {
        let lane = lane.filter(|lane| self.model.lane(lane).is_some());
        self.pointer.drag_over(&self.controller, lane)
    }

    /// Native drop over `lane`. `None` when no pointer drag was active.
    pub fn pointer_drop<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        lane: Option<&LaneId>,
    ) -> Option<DropDecision> {
        let decision = self.pointer.drop(&self.controller, &self.model, lane)?;
        self.settle_drop(&decision);
        self.teardown(surface);
        Some(decision)
    }

    /// Native drag ended. Cancels a pointer drag that saw no drop.
    pub fn pointer_drag_end<B: BoardSurface + ?Sized>(&mut self, surface: &mut B) -> bool {
        if !self.pointer.drag_end(&self.controller) {
            return false;
        }
        tracing::debug!(target: "laneboard.board", "pointer drag ended without drop");
        self.teardown(surface);
        true
    }

    // -- touch --------------------------------------------------------------

    pub fn touch_start<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        card_id: &CardId,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        let card = self.model.card(card_id);
        let dispatch = self
            .touch
            .touch_start(&mut self.controller, card, touch_id, point);
        if dispatch.outcome == TouchOutcome::Armed && !self.page_suppressed {
            surface.set_page_interaction(PageInteraction::Suppressed);
            self.page_suppressed = true;
        }
        dispatch
    }

    pub fn touch_move<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        let mut dispatch = self.touch.touch_move(&mut self.controller, touch_id, point);
        if dispatch.outcome.is_ignored() {
            return dispatch;
        }
        self.touch_hover = resolve_lane_at(&*surface, point);
        dispatch.schedule_frame = self.scroller.start();
        dispatch
    }

    pub fn touch_end<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        touch_id: u64,
        point: Point,
    ) -> TouchDispatch {
        let mut dispatch = self.touch.touch_end(&mut self.controller, touch_id, point);
        if dispatch.outcome.is_ignored() {
            return dispatch;
        }
        let target = resolve_lane_at(&*surface, point);
        if let Some(session) = self.controller.current_drag() {
            let decision =
                DropResolver::resolve(&self.model, session, target.as_ref());
            self.settle_drop(&decision);
            dispatch.drop = Some(decision);
        }
        self.teardown(surface);
        dispatch.phase = self.touch.phase();
        dispatch
    }

    pub fn touch_cancel<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        touch_id: u64,
    ) -> TouchDispatch {
        let mut dispatch = self.touch.touch_cancel(touch_id);
        if dispatch.outcome.is_ignored() {
            return dispatch;
        }
        self.teardown(surface);
        dispatch.phase = self.touch.phase();
        dispatch
    }

    // -- frames -------------------------------------------------------------

    /// Token the host should deliver on its next animation frame.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameToken> {
        self.scroller.pending_frame()
    }

    /// Run one auto-scroll tick.
    pub fn animation_frame<B: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut B,
        token: FrameToken,
    ) -> FrameOutcome {
        if !self.controller.is_armed() {
            self.scroller.stop();
            return FrameOutcome::Stale;
        }
        let outcome = self.scroller.on_frame(token, surface, &self.config);
        // Scrolling moves lanes under a stationary finger.
        if matches!(outcome, FrameOutcome::Scrolled { .. })
            && self.touch.phase() != TouchPhase::Idle
        {
            if let Some(point) = self.controller.current_drag().and_then(|s| s.last_known_pointer) {
                self.touch_hover = resolve_lane_at(&*surface, point);
            }
        }
        outcome
    }

    // -- cancellation ---------------------------------------------------------

    /// Abandon the active drag, if any, without resolving a drop.
    pub fn cancel_drag<B: BoardSurface + ?Sized>(&mut self, surface: &mut B) -> bool {
        if !self.controller.is_armed() {
            return false;
        }
        self.teardown(surface);
        true
    }

    /// Tear the board down. Returns move requests the host has not drained.
    pub fn unmount<B: BoardSurface + ?Sized>(mut self, surface: &mut B) -> Vec<MoveRequest> {
        self.teardown(surface);
        tracing::debug!(target: "laneboard.board", "board unmounted");
        std::mem::take(&mut self.outbox)
    }

    fn teardown<B: BoardSurface + ?Sized>(&mut self, surface: &mut B) {
        self.scroller.stop();
        self.touch.reset();
        self.pointer.reset();
        self.touch_hover = None;
        if self.page_suppressed {
            surface.set_page_interaction(PageInteraction::Normal);
            self.page_suppressed = false;
        }
        self.controller.end_drag();
    }

    // -- moves ----------------------------------------------------------------

    fn settle_drop(&mut self, decision: &DropDecision) {
        match decision {
            DropDecision::Move(plan) => self.commit(plan),
            other => {
                tracing::debug!(target: "laneboard.board", ?other, "drop resolved without move");
            }
        }
    }

    fn commit(&mut self, plan: &MovePlan) {
        if let Err(error) = self.model.apply_move(&plan.card_id, &plan.to_lane, plan.new_order) {
            self.sink.report(&error);
            return;
        }
        self.next_move_id = self.next_move_id.wrapping_add(1);
        let request = MoveRequest::from_plan(MoveId::new(self.next_move_id), plan);
        tracing::debug!(
            target: "laneboard.board",
            id = %request.id,
            card = %plan.card_id,
            from = %plan.from_lane,
            to = %plan.to_lane,
            order = plan.new_order,
            "move queued"
        );
        self.outbox.push(request.clone());
        self.in_flight.push(InFlightMove {
            request,
            plan: plan.clone(),
        });
    }

    /// Drain move requests for the data layer.
    pub fn take_move_requests(&mut self) -> Vec<MoveRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Moves sent or queued but not yet completed.
    #[must_use]
    pub fn in_flight_moves(&self) -> Vec<&MoveRequest> {
        self.in_flight.iter().map(|pending| &pending.request).collect()
    }

    /// Report the data layer's answer for move `id`.
    pub fn complete_move(&mut self, id: MoveId, result: Result<(), MoveRejected>) -> MoveSettled {
        let Some(index) = self.in_flight.iter().position(|p| p.request.id == id) else {
            return MoveSettled::Unknown;
        };
        let InFlightMove { request, plan } = self.in_flight.remove(index);
        self.outbox.retain(|queued| queued.id != id);

        let rejected = match result {
            Ok(()) => {
                tracing::debug!(target: "laneboard.board", %id, "move confirmed");
                return MoveSettled::Confirmed;
            }
            Err(rejected) => rejected,
        };

        let unchanged = self.model.card(&request.card_id).is_some_and(|card| {
            card.lane_id == request.to_lane && card.order == request.new_order
        });
        let settled = if unchanged {
            match self
                .model
                .apply_move(&plan.card_id, &plan.from_lane, plan.previous_order)
            {
                Ok(_) => MoveSettled::RolledBack,
                Err(error) => {
                    self.sink.report(&error);
                    MoveSettled::Superseded
                }
            }
        } else {
            // The next unsettled move of this card now starts from the
            // rejected move's origin, so its own rollback skips the lane the
            // data layer refused.
            if let Some(successor) = self.in_flight[index..]
                .iter_mut()
                .find(|pending| pending.plan.card_id == plan.card_id)
            {
                successor.plan.from_lane = plan.from_lane.clone();
                successor.plan.previous_order = plan.previous_order;
            }
            MoveSettled::Superseded
        };

        let error = BoardError::MoveRejected {
            card_id: request.card_id.clone(),
            to_lane: request.to_lane.clone(),
            reason: rejected.reason,
        };
        tracing::warn!(
            target: "laneboard.board",
            %id,
            card = %request.card_id,
            to = %request.to_lane,
            ?settled,
            %error,
            "move rejected"
        );
        self.sink.report(&error);
        settled
    }

    /// Send every queued request through `mover` and complete each one.
    pub fn flush_moves<M: CardMover + ?Sized>(
        &mut self,
        mover: &mut M,
    ) -> Vec<(MoveId, MoveSettled)> {
        self.take_move_requests()
            .into_iter()
            .map(|request| {
                let result = mover.move_card(&request);
                (request.id, self.complete_move(request.id, result))
            })
            .collect()
    }

    // -- affordances ------------------------------------------------------------

    /// "Add card" on `lane`. Unknown lanes are ignored.
    pub fn request_create_card(&mut self, lane: &LaneId) -> bool {
        if self.model.lane(lane).is_none() {
            return false;
        }
        self.events.push(BoardEvent::CreateCardRequested {
            lane_id: lane.clone(),
        });
        true
    }

    /// Card click. Ignored for unknown cards and while a drag is active.
    pub fn open_card(&mut self, card_id: &CardId) -> bool {
        if self.controller.is_armed() || self.model.card(card_id).is_none() {
            return false;
        }
        self.events.push(BoardEvent::CardOpened {
            card_id: card_id.clone(),
        });
        true
    }

    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // -- view -------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> BoardView {
        let wip = self.wip();
        let session = self.controller.current_drag();
        let hover = self.pointer.hover_lane().or(self.touch_hover.as_ref());
        let lanes = self
            .model
            .lanes()
            .iter()
            .map(|lane| {
                let load = wip.lane(&lane.id);
                let is_origin = session.is_some_and(|s| s.origin_lane_id == lane.id);
                LaneView {
                    lane_id: lane.id.clone(),
                    title: lane.title.clone(),
                    cards: self
                        .model
                        .cards_in(&lane.id)
                        .into_iter()
                        .filter(|card| {
                            self.filter.as_ref().is_none_or(|ids| ids.contains(&card.id))
                        })
                        .map(|card| card.id.clone())
                        .collect(),
                    count: load.map_or(0, |l| l.count),
                    limit: load.and_then(|l| l.limit),
                    over_limit: load.is_some_and(|l| l.over_limit),
                    is_drop_target: session.is_some() && !is_origin && hover == Some(&lane.id),
                    is_origin,
                }
            })
            .collect();
        BoardView {
            lanes,
            preview: self.touch.preview(),
            dragging: session.map(|s| s.card_id.clone()),
        }
    }
}
