mod persistence;
mod screens;
mod workflow;
