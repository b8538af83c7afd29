//! Ship designs, fleets and troop transports.

pub mod types;

pub use types::{
    DesignId, DesignRole, DesignRoles, FleetId, ShipDesign, ShipFleet, ShipLab, ShipStack,
    Transport, TransportId,
};
