pub mod bar_chart;
pub mod box_plot;
pub mod header;
pub mod line_chart;
pub mod metric_card;
