//! RPC requests accepted on `POST /rpc` (and inside ws `Call` frames).
//!
//! Place-scoped operations carry the place's unique name; operations
//! performed *by* an occupant carry their network handle (`who`), which
//! the server resolves to a deliverable occupant handle. Person-scoped
//! operations address occupants owned by the receiving server.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing or renaming variants is a breaking change

use serde::{Deserialize, Serialize};

use mudlink_domain::{PersonAddr, PersonId};

/// Messages from any caller (client or peer server) to a world server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    // =========================================================================
    // Server operations
    // =========================================================================
    /// Return the name of this world.
    GetMudName,
    /// Return the bootstrap place of this world.
    GetEntrance,
    /// Look up a registered place by name.
    GetNamedPlace { name: String },
    /// Persist the place graph to the named server-side file.
    Dump { password: String, target: String },

    // =========================================================================
    // Place operations
    // =========================================================================
    /// Name of the place (echoes the key; confirms liveness).
    GetPlaceName { place: String },
    /// Description of the place.
    GetDescription { place: String },
    /// Display names of everyone currently here.
    GetNames { place: String },
    /// Names of the things lying around here.
    GetThings { place: String },
    /// Names of the exits leading out of here.
    GetExits { place: String },
    /// Handle of the named occupant.
    GetPerson { place: String, name: String },
    /// Closer look at the named thing.
    ExamineThing { place: String, name: String },
    /// The owning server of this place (clients need it for prompts and dump).
    GetServer { place: String },
    /// Traverse the named exit.
    Go {
        place: String,
        who: PersonAddr,
        exit: String,
    },
    /// Say something to everyone here.
    Speak {
        place: String,
        who: PersonAddr,
        message: String,
    },
    /// Do something everyone here can see.
    Act {
        place: String,
        who: PersonAddr,
        message: String,
    },
    /// Put a new thing here.
    CreateThing {
        place: String,
        who: PersonAddr,
        name: String,
        description: String,
    },
    /// Remove a thing from here.
    DestroyThing {
        place: String,
        who: PersonAddr,
        name: String,
    },
    /// Open a new place, bidirectionally wired to this one.
    CreatePlace {
        place: String,
        who: PersonAddr,
        exit: String,
        entrance: String,
        name: String,
        description: String,
    },
    /// Link an exit to a place that may live on another server.
    /// Unidirectional; the return path is a separate call on the far side.
    LinkTo {
        place: String,
        who: PersonAddr,
        exit: String,
        host: String,
        world: String,
        name: String,
    },
    /// Remove an exit. Never touches a reciprocal exit on the far side.
    Close {
        place: String,
        who: PersonAddr,
        exit: String,
    },
    /// Put an occupant into this place, announcing them to everyone else.
    Enter {
        place: String,
        who: PersonAddr,
        name: String,
        #[serde(default)]
        message: Option<String>,
    },
    /// Remove an occupant from this place. A no-op if they are absent.
    Exit {
        place: String,
        who: PersonAddr,
        #[serde(default)]
        message: Option<String>,
    },

    // =========================================================================
    // Person operations (occupants owned by the receiving server)
    // =========================================================================
    /// Deliver a line to the occupant's client.
    Tell { person: PersonId, message: String },
    /// The occupant's self-description.
    GetPersonDescription { person: PersonId },
}
