//! Ring-by-ring search for the nearest unoccupied cell.

use std::error::Error;
use std::fmt;

use glam::Vec2;
use tessel_core::{CodecError, GridCoord, OccupantId, Signature};
use tessel_index::{OccupancyIndex, ValiditySet};
use tessel_space::RingEnumerator;

/// Bias vectors shorter than this count as "no bias".
const MIN_BIAS_LENGTH_SQUARED: f32 = 1e-12;

/// Parameters of a vacancy search.
///
/// # Examples
///
/// ```
/// use tessel_core::{OccupantId, Vec2};
/// use tessel_engine::VacancyQuery;
///
/// let own = [OccupantId(4)];
/// let query = VacancyQuery::new(Vec2::new(3.0, 1.0))
///     .bias(Vec2::X)
///     .max_magnitude(8)
///     .excluding(&own);
/// assert_eq!(query.target(), Vec2::new(3.0, 1.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VacancyQuery<'a> {
    target: Vec2,
    bias: Option<Vec2>,
    max_magnitude: Option<u32>,
    excluding: &'a [OccupantId],
    valid_only: bool,
}

impl VacancyQuery<'static> {
    /// Search around the world position `target`.
    pub fn new(target: Vec2) -> Self {
        Self {
            target,
            bias: None,
            max_magnitude: None,
            excluding: &[],
            valid_only: false,
        }
    }
}

impl<'a> VacancyQuery<'a> {
    /// Prefer candidates in direction `dir` from the target.
    pub fn bias(mut self, dir: Vec2) -> Self {
        self.bias = Some(dir);
        self
    }

    /// Largest ring to examine. Defaults to the grid's configured bound.
    pub fn max_magnitude(mut self, m: u32) -> Self {
        self.max_magnitude = Some(m);
        self
    }

    /// Ignore these occupants when deciding whether a cell is free.
    pub fn excluding<'b>(self, ids: &'b [OccupantId]) -> VacancyQuery<'b> {
        VacancyQuery {
            target: self.target,
            bias: self.bias,
            max_magnitude: self.max_magnitude,
            excluding: ids,
            valid_only: self.valid_only,
        }
    }

    /// Only accept cells in the validity set. Off by default, so a free
    /// target cell is returned even where the terrain is not walkable.
    /// With no validity set loaded nothing qualifies.
    pub fn valid_only(mut self, valid_only: bool) -> Self {
        self.valid_only = valid_only;
        self
    }

    /// The search target.
    pub fn target(&self) -> Vec2 {
        self.target
    }
}

/// A vacant cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vacancy {
    /// Grid coordinate of the cell.
    pub coord: GridCoord,
    /// Signature of the cell.
    pub signature: Signature,
    /// World-space centre of the cell.
    pub position: Vec2,
    /// Ring the cell was found on; 0 means the target cell itself was free.
    pub magnitude: u32,
}

/// Errors from a vacancy search.
#[derive(Clone, Debug, PartialEq)]
pub enum VacancyError {
    /// The target is not finite or maps outside the grid.
    TargetOutOfBounds {
        /// The rejected target.
        target: Vec2,
    },
    /// Every ring up to the bound was fully occupied or off the grid.
    NoVacancy {
        /// The largest ring examined.
        max_magnitude: u32,
    },
    /// A ring could not be enumerated.
    Codec(CodecError),
}

impl fmt::Display for VacancyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetOutOfBounds { target } => {
                write!(f, "vacancy target {target} lies outside the grid")
            }
            Self::NoVacancy { max_magnitude } => {
                write!(f, "no vacant cell within {max_magnitude} rings")
            }
            Self::Codec(e) => write!(f, "codec: {e}"),
        }
    }
}

impl Error for VacancyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for VacancyError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

/// Borrowed view of the grid state a vacancy search reads.
#[derive(Clone, Copy, Debug)]
pub struct VacancySearch<'g> {
    rings: &'g RingEnumerator,
    occupancy: &'g OccupancyIndex,
    validity: Option<&'g ValiditySet>,
    cell_size: f32,
}

impl<'g> VacancySearch<'g> {
    /// Search over `occupancy`, restricted to `validity` when a query asks
    /// for valid cells only.
    pub fn new(
        rings: &'g RingEnumerator,
        occupancy: &'g OccupancyIndex,
        validity: Option<&'g ValiditySet>,
        cell_size: f32,
    ) -> Self {
        Self {
            rings,
            occupancy,
            validity,
            cell_size,
        }
    }

    /// Find the free cell nearest `query.target()` in ring order.
    ///
    /// The target cell is returned immediately when free. Otherwise each
    /// ring `1..=max` is enumerated in turn and the first ring with a free
    /// cell decides: without a bias the first free cell in enumeration
    /// order wins, with a bias the free cell whose direction from the target
    /// best aligns with it wins. The search stops early once a whole ring
    /// lies outside the grid. `ring` is scratch space and is cleared first.
    pub fn find(
        &self,
        query: &VacancyQuery<'_>,
        default_max: u32,
        ring: &mut Vec<Signature>,
    ) -> Result<Vacancy, VacancyError> {
        let codec = self.rings.codec();
        let topology = self.rings.topology();
        let out_of_bounds = VacancyError::TargetOutOfBounds {
            target: query.target,
        };
        let center = topology
            .world_to_grid(query.target, self.cell_size)
            .filter(|c| codec.contains(*c))
            .ok_or(out_of_bounds)?;
        let center_sig = codec.encode(center)?;

        let is_free = |sig: Signature| {
            if self.occupancy.is_occupied(sig, query.excluding) {
                return false;
            }
            !query.valid_only || self.validity.is_some_and(|v| v.contains(sig))
        };

        if is_free(center_sig) {
            return self.vacancy(center_sig, 0);
        }

        let bias = query
            .bias
            .filter(|b| b.length_squared() > MIN_BIAS_LENGTH_SQUARED);
        let max_magnitude = query.max_magnitude.unwrap_or(default_max);

        for magnitude in 1..=max_magnitude {
            if self.rings.ring_outside_domain(center, magnitude) {
                break;
            }
            ring.clear();
            self.rings.ring_into(center_sig, magnitude, ring)?;

            let chosen = match bias {
                None => ring.iter().copied().find(|&sig| is_free(sig)),
                Some(dir) => {
                    let mut best: Option<(Signature, f32)> = None;
                    for &sig in ring.iter().filter(|&&sig| is_free(sig)) {
                        let pos = topology.grid_to_world(codec.decode(sig)?, self.cell_size);
                        let score = dir.dot((pos - query.target).normalize_or_zero());
                        // Strictly greater keeps the earliest candidate on ties.
                        if best.is_none_or(|(_, s)| score > s) {
                            best = Some((sig, score));
                        }
                    }
                    best.map(|(sig, _)| sig)
                }
            };
            if let Some(sig) = chosen {
                return self.vacancy(sig, magnitude);
            }
        }
        Err(VacancyError::NoVacancy { max_magnitude })
    }

    fn vacancy(&self, signature: Signature, magnitude: u32) -> Result<Vacancy, VacancyError> {
        let coord = self.rings.codec().decode(signature)?;
        Ok(Vacancy {
            coord,
            signature,
            position: self.rings.topology().grid_to_world(coord, self.cell_size),
            magnitude,
        })
    }
}
