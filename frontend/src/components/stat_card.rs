use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    #[prop_or_default]
    pub caption: Option<AttrValue>,
    #[prop_or_default]
    pub caption_class: Option<AttrValue>,
    pub icon: fn() -> Html,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let caption_class = props
        .caption_class
        .clone()
        .unwrap_or_else(|| AttrValue::from("text-muted-foreground"));

    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title.clone() }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ props.value.clone() }</h3>
                if let Some(caption) = &props.caption {
                    <p class={classes!("text-xs", "mt-1", caption_class.to_string())}>{ caption.clone() }</p>
                }
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                { (props.icon)() }
            </div>
        </div>
    }
}
