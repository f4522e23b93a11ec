pub mod banner;
pub mod month_grid;
pub mod status_bar;

pub use banner::Banner;
pub use month_grid::MonthGrid;
pub use status_bar::StatusBar;
