use common::format_price_compact;
use compute::aggregate::SummaryStats;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatsProps {
    pub stats: SummaryStats,
    #[prop_or_default]
    pub compact: bool,
}

#[function_component(Stats)]
pub fn stats(props: &StatsProps) -> Html {
    let stats = &props.stats;

    let cards = [
        ("Total Predictions", stats.count.to_string(), "fas fa-list-ol", "text-primary"),
        ("Average Price", format_price_compact(stats.average), "fas fa-scale-balanced", "text-info"),
        ("Lowest Price", format_price_compact(stats.min), "fas fa-arrow-down", "text-success"),
        ("Highest Price", format_price_compact(stats.max), "fas fa-arrow-up", "text-error"),
    ];

    let grid = if props.compact {
        "grid grid-cols-2 gap-4"
    } else {
        "grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4"
    };

    html! {
        <div class={grid}>
            {for cards.into_iter().map(|(title, value, icon, color)| html! {
                <div class="stats shadow bg-base-100">
                    <div class="stat">
                        <div class={classes!("stat-figure", color)}><i class={classes!(icon, "text-2xl")}></i></div>
                        <div class="stat-title">{title}</div>
                        <div class={classes!("stat-value", color)}>{value}</div>
                    </div>
                </div>
            })}
        </div>
    }
}
