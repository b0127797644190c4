// Trip output: one tab-separated line per trip.

use crate::resort::Trip;
use std::fmt;
use std::io::{self, Write};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}\t{} - {} \t{} nights\t{}",
            self.resort,
            self.room_type,
            self.view_type,
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT),
            self.nights,
            self.points,
        )
    }
}

// Receives each trip as soon as the scanner finds it
pub trait TripReporter {
    fn report(&mut self, trip: &Trip) -> io::Result<()>;
}

impl TripReporter for Vec<Trip> {
    fn report(&mut self, trip: &Trip) -> io::Result<()> {
        self.push(trip.clone());
        Ok(())
    }
}

// Writes trips as newline-terminated lines
pub struct LineReporter<W: Write> {
    out: W,
}

impl<W: Write> LineReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TripReporter for LineReporter<W> {
    fn report(&mut self, trip: &Trip) -> io::Result<()> {
        writeln!(self.out, "{}", trip)
    }
}
