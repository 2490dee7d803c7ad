mod common;

mod authz;
