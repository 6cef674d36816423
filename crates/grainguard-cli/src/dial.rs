use grainguard_core::dial::{TemperatureDial, RECOMMENDED_MAX_CELSIUS, RECOMMENDED_MIN_CELSIUS};

pub(crate) fn run_dial(celsius: i32) {
    let dial = TemperatureDial::new(celsius);
    if dial.celsius() != celsius {
        eprintln!("{celsius}\u{b0}C is outside the dial; clamped to {}\u{b0}C", dial.celsius());
    }

    println!("setpoint:     {}\u{b0}C", dial.celsius());
    println!("position:     {:.1}%", dial.percentage());
    println!("needle:       {:.1}\u{b0}", dial.needle_angle());
    println!("dash offset:  {:.1}", dial.dash_offset());
    if dial.is_out_of_range() {
        println!(
            "status:       outside the recommended {RECOMMENDED_MIN_CELSIUS}-{RECOMMENDED_MAX_CELSIUS}\u{b0}C range"
        );
    } else {
        println!("status:       optimal");
    }
}
