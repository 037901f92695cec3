use core::fmt;

/// Broken-down calendar time as exchanged between kernel and RTC drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtcTime {
    pub sec: u8,
    pub min: u8,
    pub hour: u8,
    // Days since Sunday, None when the hardware reports no valid weekday
    pub wday: Option<u8>,
    pub mday: u8,
    // Months since January, None for a wildcard alarm month
    pub mon: Option<u8>,
    // Years since 1900
    pub year: u16
}

impl fmt::Display for RtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.mon.map_or(0, |mon| mon as u32 + 1);
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            1900 + self.year as u32, month, self.mday, self.hour, self.min, self.sec
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtcWkAlarm {
    pub time: RtcTime,
    pub enabled: bool,
    pub pending: bool
}

/// Operations an RTC driver provides to the kernel's RTC class
pub trait RtcOps {
    type Error;

    fn read_time(&self) -> Result<RtcTime, Self::Error>;

    fn set_time(&self, tm: &RtcTime) -> Result<(), Self::Error>;

    fn read_alarm(&self) -> Result<RtcWkAlarm, Self::Error>;

    fn set_alarm(&self, alrm: &RtcWkAlarm) -> Result<(), Self::Error>;

    fn alarm_irq_enable(&self, enabled: bool) -> Result<(), Self::Error>;
}
