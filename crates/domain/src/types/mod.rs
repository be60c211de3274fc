//! Domain types and models

pub mod credentials;
pub mod drops;
pub mod lists;
pub mod notice;
pub mod process;
pub mod schedule;

pub use credentials::{SessionCredentials, SessionValidation};
pub use drops::{
    DropEntry, DropsRemaining, DropsSummary, FreeGame, FreeGameRedemption, FreeGames,
    GamesWithDrops,
};
pub use lists::{CustomList, ListedGame, CARD_FARMING_LIST};
pub use notice::{AppEvent, Notice};
pub use process::{IdleProcessEntry, RawProcess, RunningProcesses};
pub use schedule::{ScheduleWindow, TimeOfDay};
