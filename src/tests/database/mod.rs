mod folders;
mod monsters;
mod settings;
mod spells;
