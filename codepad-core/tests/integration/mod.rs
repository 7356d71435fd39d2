mod outline_tests;
mod tab_lifecycle_tests;
mod workspace_flow_tests;
