// Executive dashboard data provisioning - layered the same way as the binary wires it
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
