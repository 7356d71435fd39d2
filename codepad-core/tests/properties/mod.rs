mod editor_tests;
mod outline_tests;
mod split_layout_tests;
mod tab_manager_tests;
