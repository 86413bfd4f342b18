//! Scatter plots and force-directed character networks: axis scaling, the
//! layout engine, and selection logic shared by the viewer.

pub mod data;
pub mod scale;
pub mod select;
pub mod sim;
