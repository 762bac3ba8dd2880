//! The three Oracle SCM business flows the mentor can teach.
//!
//! Each flow carries a display label, a one-line knowledge hint for the
//! prompt assembler, and an ordered list of step names used for the quick
//! reference display. All of it is static; nothing here mutates at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the predefined Oracle SCM business-transaction flows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    /// Procure-to-Pay: purchasing goods and paying suppliers.
    #[default]
    ProcureToPay,

    /// Order-to-Cash: selling goods and collecting payment.
    OrderToCash,

    /// Plan-to-Produce: forecasting demand and manufacturing to meet it.
    PlanToProduce,
}

impl Flow {
    /// All flows, in the order they are presented to the user.
    pub const ALL: [Flow; 3] = [Flow::ProcureToPay, Flow::OrderToCash, Flow::PlanToProduce];

    /// The full display label, e.g. "Procure-to-Pay (P2P)".
    pub fn label(&self) -> &'static str {
        match self {
            Flow::ProcureToPay => "Procure-to-Pay (P2P)",
            Flow::OrderToCash => "Order-to-Cash (O2C)",
            Flow::PlanToProduce => "Plan-to-Produce",
        }
    }

    /// The short alias, e.g. "P2P".
    pub fn short_name(&self) -> &'static str {
        match self {
            Flow::ProcureToPay => "P2P",
            Flow::OrderToCash => "O2C",
            Flow::PlanToProduce => "Plan-to-Produce",
        }
    }

    /// A one-line summary of the flow used in the assembled instructions.
    pub fn knowledge(&self) -> &'static str {
        match self {
            Flow::ProcureToPay => {
                "Requisition Creation, PO creation, receipt, 3-way match, invoice, payment"
            }
            Flow::OrderToCash => {
                "Quote, Order, Picking, Packing, Shipping, Invoice, AR, Collection"
            }
            Flow::PlanToProduce => {
                "Forecast, Planning, MRP, Manufacturing, Costing, Completion"
            }
        }
    }

    /// The ordered steps of the flow, for the quick reference display.
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            Flow::ProcureToPay => &[
                "Purchase Requisition Creation",
                "Purchase Order Generation",
                "Goods Receipt/PO Receipt",
                "Three-Way Match",
                "Invoice Matching & Receipt",
                "Payment Processing",
                "Payment Reconciliation",
            ],
            Flow::OrderToCash => &[
                "Sales Quote Creation",
                "Sales Order Entry",
                "Order Reservation & Allocation",
                "Picking & Staging",
                "Packing & Labeling",
                "Shipment",
                "Invoice Generation",
                "Accounts Receivable Recording",
                "Collection & Payment",
            ],
            Flow::PlanToProduce => &[
                "Demand Forecasting",
                "Production Planning",
                "Master Scheduling",
                "Material Requirements Planning (MRP)",
                "Manufacturing Order Release",
                "Component Picking",
                "Manufacturing Execution",
                "Quality Inspection",
                "Completion & Receipt",
                "Inventory Costing",
            ],
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Flow {
    type Err = Error;

    /// Accepts the full label, the short alias, or common spellings,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "p2p" | "procure-to-pay" | "procure to pay" | "procure-to-pay (p2p)" => {
                Ok(Flow::ProcureToPay)
            }
            "o2c" | "order-to-cash" | "order to cash" | "order-to-cash (o2c)" => {
                Ok(Flow::OrderToCash)
            }
            "plan-to-produce" | "plan to produce" | "p2prod" => Ok(Flow::PlanToProduce),
            _ => Err(Error::validation(
                format!(
                    "unknown business flow '{s}' (expected one of: P2P, O2C, Plan-to-Produce)"
                ),
                Some("flow".to_string()),
            )),
        }
    }
}
