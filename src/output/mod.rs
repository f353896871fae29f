mod report;

pub use report::write_route_report;
