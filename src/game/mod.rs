pub mod animator;
pub mod constants;
pub mod direction;
pub mod field;
pub mod planner;
pub mod player;
pub mod scene;
pub mod session;
pub mod snake;
pub mod spawn;
pub mod timing;
pub mod types;
