//! Mesh topologies and the index-size calculator.
//!
//! A topology says how the rectangular sample grid is closed up: each axis
//! either stays open, wraps around periodically, or wraps with the other
//! coordinate mirrored. Square variants join grid neighbours only; triangle
//! variants add one diagonal per cell.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::canvas::Resolution;

/// How one axis of the grid is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seam {
    /// The last row/column has no neighbour past it.
    Open,
    /// The last row/column connects back to the first.
    Periodic,
    /// Like `Periodic`, but the other coordinate is mirrored across the seam.
    Twisted,
}

/// Connectivity pattern of a wireframe. Discriminants are the raw codes
/// exchanged with hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum Topology {
    PlanarSquare = 0,
    PlanarTriangle = 1,
    CylindricalSquare = 2,
    CylindricalTriangle = 3,
    MobiusSquare = 4,
    MobiusTriangle = 5,
    ToroidalSquare = 6,
    ToroidalTriangle = 7,
    KleinSquare = 8,
    KleinTriangle = 9,
    ProjectiveSquare = 10,
    ProjectiveTriangle = 11,
}

impl Topology {
    pub const ALL: [Topology; 12] = [
        Topology::PlanarSquare,
        Topology::PlanarTriangle,
        Topology::CylindricalSquare,
        Topology::CylindricalTriangle,
        Topology::MobiusSquare,
        Topology::MobiusTriangle,
        Topology::ToroidalSquare,
        Topology::ToroidalTriangle,
        Topology::KleinSquare,
        Topology::KleinTriangle,
        Topology::ProjectiveSquare,
        Topology::ProjectiveTriangle,
    ];

    /// Decodes a raw host code. Codes past the last variant yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PlanarSquare => "planar-square",
            Self::PlanarTriangle => "planar-triangle",
            Self::CylindricalSquare => "cylindrical-square",
            Self::CylindricalTriangle => "cylindrical-triangle",
            Self::MobiusSquare => "mobius-square",
            Self::MobiusTriangle => "mobius-triangle",
            Self::ToroidalSquare => "toroidal-square",
            Self::ToroidalTriangle => "toroidal-triangle",
            Self::KleinSquare => "klein-square",
            Self::KleinTriangle => "klein-triangle",
            Self::ProjectiveSquare => "projective-square",
            Self::ProjectiveTriangle => "projective-triangle",
        }
    }

    /// Whether each cell also gets a diagonal segment.
    pub fn has_diagonals(self) -> bool {
        matches!(
            self,
            Self::PlanarTriangle
                | Self::CylindricalTriangle
                | Self::MobiusTriangle
                | Self::ToroidalTriangle
                | Self::KleinTriangle
                | Self::ProjectiveTriangle
        )
    }

    /// Seams along the x axis (right edge to left edge) and the y axis (top
    /// edge to bottom edge).
    pub fn seams(self) -> (Seam, Seam) {
        match self {
            Self::PlanarSquare | Self::PlanarTriangle => (Seam::Open, Seam::Open),
            Self::CylindricalSquare | Self::CylindricalTriangle => (Seam::Periodic, Seam::Open),
            Self::MobiusSquare | Self::MobiusTriangle => (Seam::Twisted, Seam::Open),
            Self::ToroidalSquare | Self::ToroidalTriangle => (Seam::Periodic, Seam::Periodic),
            Self::KleinSquare | Self::KleinTriangle => (Seam::Twisted, Seam::Periodic),
            Self::ProjectiveSquare | Self::ProjectiveTriangle => (Seam::Twisted, Seam::Twisted),
        }
    }

    /// Number of index slots (two per segment) this topology is sized for.
    pub fn index_size(self, resolution: Resolution) -> usize {
        let nx = resolution.nx as usize;
        let ny = resolution.ny as usize;
        let product = nx * ny;
        let sum = nx + ny;

        match self {
            Self::PlanarSquare => 2 * (2 * product).saturating_sub(sum),
            Self::PlanarTriangle => 2 * (3 * product).saturating_sub(2 * sum),
            Self::CylindricalSquare | Self::MobiusSquare => 2 * (2 * product).saturating_sub(nx),
            Self::CylindricalTriangle | Self::MobiusTriangle => {
                2 * (3 * product).saturating_sub(2 * nx)
            }
            Self::ToroidalSquare | Self::KleinSquare | Self::ProjectiveSquare => 4 * product,
            Self::ToroidalTriangle | Self::KleinTriangle | Self::ProjectiveTriangle => 6 * product,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown topology name `{0}`")]
pub struct ParseTopologyError(pub String);

impl FromStr for Topology {
    type Err = ParseTopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| ParseTopologyError(s.to_string()))
    }
}

/// Index slots needed by a canvas with the given raw topology code.
///
/// Unrecognised codes give 0 instead of an error; callers treat a zero count
/// as a misconfigured canvas.
pub fn compute_index_size(resolution: Resolution, topology_code: u32) -> usize {
    match Topology::from_code(topology_code) {
        Some(topology) => topology.index_size(resolution),
        None => 0,
    }
}
