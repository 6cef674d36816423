use grainguard_core::plans::plans;

pub(crate) fn run_plans() {
    for plan in plans() {
        let quote = plan.quote();
        let badge = if plan.popular { "  [popular]" } else { "" };
        println!(
            "{:>2} month{:<2} {:>5} kg   \u{20b9}{} + \u{20b9}{} GST = \u{20b9}{}{badge}",
            plan.months,
            if plan.months == 1 { "" } else { "s" },
            plan.storage_kg,
            quote.subtotal,
            quote.gst,
            quote.total,
        );
        println!("    {}", plan.features.join(", "));
    }
}
