//! # Claim Status State Machine
//!
//! All mutations of a [`Claim`] go through these methods. Each checks, in
//! order: terminal state, actor authorization, then transition preconditions.
//! A rejected transition leaves the claim untouched.
//!
//! | Transition | From | Allowed actors |
//! |------------|------|----------------|
//! | `mark_scanned` | `Active{scanned: false}` | ledger verification only |
//! | `complete` (pickup) | `Active{scanned: true}` | provider, receiver, admin |
//! | `complete` (delivery) | `Active{scanned: true, Delivering}` | courier, receiver, admin |
//! | `cancel` | `Active` | provider, receiver, admin |
//! | `assign_courier` | `Active`, delivery, no courier | the courier itself, admin |
//! | `start_delivery` | `Active{scanned: true, PickingUp}` | assigned courier, admin |
//! | `attach_review` | `Completed` | receiver |
//! | `attach_report` | any | any party to the claim, admin |

use super::entities::{Claim, ClaimState, CourierAssignment, CourierLeg, Report, Review};
use super::errors::LedgerError;
use shared_types::{
    Actor, CourierId, CourierStatus, DeliveryMethod, ReceiverId, ReportReason, ReportStatus,
    Timestamp,
};

impl Claim {
    /// Fails with the matching terminal error unless the claim is active.
    fn ensure_active(&self) -> Result<(), LedgerError> {
        match self.state {
            ClaimState::Active { .. } => Ok(()),
            ClaimState::Completed { .. } => Err(LedgerError::AlreadyCompleted(self.id.clone())),
            ClaimState::Cancelled { .. } => Err(LedgerError::AlreadyCancelled(self.id.clone())),
        }
    }

    fn is_provider(&self, actor: &Actor) -> bool {
        matches!(actor, Actor::Provider(id) if *id == self.provider_id)
    }

    fn is_receiver(&self, actor: &Actor) -> bool {
        matches!(actor, Actor::Receiver(id) if *id == self.receiver_id)
    }

    fn is_assigned_courier(&self, actor: &Actor) -> bool {
        match (actor, self.state.courier()) {
            (Actor::Courier(id), Some(courier)) => *id == courier.id,
            _ => false,
        }
    }

    /// Any party to the claim, or an admin.
    pub fn is_party(&self, actor: &Actor) -> bool {
        matches!(actor, Actor::Admin)
            || self.is_provider(actor)
            || self.is_receiver(actor)
            || self.is_assigned_courier(actor)
    }

    /// One-way scan latch. Only the ledger's verification path calls this.
    pub(crate) fn mark_scanned(&mut self) -> Result<(), LedgerError> {
        self.ensure_active()?;
        if let ClaimState::Active { scanned, .. } = &mut self.state {
            *scanned = true;
        }
        Ok(())
    }

    /// `active → completed`. Requires a verified handover.
    pub fn complete(&mut self, actor: &Actor, now: Timestamp) -> Result<(), LedgerError> {
        self.ensure_active()?;

        let authorized = matches!(actor, Actor::Admin)
            || self.is_receiver(actor)
            || match self.delivery_method {
                DeliveryMethod::Pickup => self.is_provider(actor),
                DeliveryMethod::Delivery => self.is_assigned_courier(actor),
            };
        if !authorized {
            return Err(LedgerError::NotAuthorized("complete"));
        }

        if !self.is_scanned() {
            return Err(LedgerError::NotScanned(self.id.clone()));
        }

        if self.delivery_method == DeliveryMethod::Delivery {
            match self.state.courier_stage() {
                None => return Err(LedgerError::CourierNotAssigned(self.id.clone())),
                Some(CourierStatus::PickingUp) => {
                    return Err(LedgerError::CourierNotDelivering(self.id.clone()))
                }
                Some(CourierStatus::Delivering) => {}
            }
        }

        let courier = self.state.courier().cloned();
        self.state = ClaimState::Completed { at: now, courier };
        Ok(())
    }

    /// `active → cancelled`. Stock is not returned to the listing.
    pub fn cancel(
        &mut self,
        actor: &Actor,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.ensure_active()?;

        if !(matches!(actor, Actor::Admin) || self.is_provider(actor) || self.is_receiver(actor)) {
            return Err(LedgerError::NotAuthorized("cancel"));
        }

        let scanned = self.is_scanned();
        let courier = self.state.courier().cloned();
        self.state = ClaimState::Cancelled {
            at: now,
            reason: reason.filter(|r| !r.trim().is_empty()),
            scanned,
            courier,
        };
        Ok(())
    }

    /// Courier leg `unassigned → picking_up`.
    pub fn assign_courier(
        &mut self,
        actor: &Actor,
        courier_id: CourierId,
        courier_name: String,
    ) -> Result<(), LedgerError> {
        self.ensure_active()?;

        let authorized = match actor {
            Actor::Admin => true,
            Actor::Courier(id) => *id == courier_id,
            _ => false,
        };
        if !authorized {
            return Err(LedgerError::NotAuthorized("assign a courier to"));
        }

        if self.delivery_method != DeliveryMethod::Delivery {
            return Err(LedgerError::NotADeliveryClaim(self.id.clone()));
        }

        if let ClaimState::Active { courier, .. } = &mut self.state {
            if let Some(leg) = courier {
                return Err(LedgerError::CourierAlreadyAssigned {
                    claim_id: self.id.clone(),
                    courier_id: leg.courier.id.clone(),
                });
            }
            *courier = Some(CourierLeg {
                courier: CourierAssignment {
                    id: courier_id,
                    name: courier_name,
                },
                stage: CourierStatus::PickingUp,
            });
        }
        Ok(())
    }

    /// Courier leg `picking_up → delivering`. The provider must have verified
    /// the handover to the courier first.
    pub fn start_delivery(&mut self, actor: &Actor) -> Result<(), LedgerError> {
        self.ensure_active()?;

        if self.delivery_method != DeliveryMethod::Delivery {
            return Err(LedgerError::NotADeliveryClaim(self.id.clone()));
        }
        let Some(stage) = self.state.courier_stage() else {
            return Err(LedgerError::CourierNotAssigned(self.id.clone()));
        };

        if !(matches!(actor, Actor::Admin) || self.is_assigned_courier(actor)) {
            return Err(LedgerError::NotAuthorized("start delivery of"));
        }

        if stage == CourierStatus::Delivering {
            return Err(LedgerError::InvalidTransition(
                "courier is already delivering".to_string(),
            ));
        }
        if !self.is_scanned() {
            return Err(LedgerError::NotScanned(self.id.clone()));
        }

        if let ClaimState::Active {
            courier: Some(leg), ..
        } = &mut self.state
        {
            leg.stage = CourierStatus::Delivering;
        }
        Ok(())
    }

    /// Attaches the receiver's review. At most once, completed claims only.
    pub fn attach_review(
        &mut self,
        reviewer: &ReceiverId,
        rating: u8,
        text: String,
        media: Vec<String>,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if !matches!(self.state, ClaimState::Completed { .. }) {
            return Err(LedgerError::NotCompleted(self.id.clone()));
        }
        if *reviewer != self.receiver_id {
            return Err(LedgerError::NotAuthorized("review"));
        }
        if self.review.is_some() {
            return Err(LedgerError::AlreadyReviewed(self.id.clone()));
        }
        if !(1..=5).contains(&rating) {
            return Err(LedgerError::InvalidRating(rating));
        }

        self.review = Some(Review {
            rating,
            text: text.trim().to_string(),
            media,
            submitted_at: now,
        });
        Ok(())
    }

    /// Attaches a problem report. At most once, any state.
    pub fn attach_report(
        &mut self,
        reporter: Actor,
        reason: ReportReason,
        description: String,
        evidence: Vec<String>,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if !self.is_party(&reporter) {
            return Err(LedgerError::NotAuthorized("report"));
        }
        if self.report.is_some() {
            return Err(LedgerError::AlreadyReported(self.id.clone()));
        }
        let description = description.trim().to_string();
        if reason.requires_description() && description.is_empty() {
            return Err(LedgerError::MissingDescription);
        }

        self.report = Some(Report {
            reason,
            description,
            evidence,
            status: ReportStatus::Pending,
            filed_by: reporter,
            filed_at: now,
        });
        Ok(())
    }
}
