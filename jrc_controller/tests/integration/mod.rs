mod lifecycle;
mod move_to_start;
mod rig;
